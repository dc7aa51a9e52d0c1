//! Per-instruction machine-code encoders (spec.md §4.4). Operand
//! selection is fixed — RAX on x86-64, X0 on AArch64 — which is enough
//! for the placeholder program these encoders ultimately serve; any
//! opcode the encoder doesn't special-case lowers to a single NOP.

pub mod aarch64;
pub mod x86_64;

use gdsc_ir::{Instruction, Module};

use crate::target::Arch;

/// Concatenates the machine code for every instruction of every
/// function in `module`, in function/block/instruction order.
pub fn encode_module(module: &Module, arch: Arch) -> Vec<u8> {
    let mut out = Vec::new();
    for function in &module.functions {
        for block in &function.blocks {
            for instruction in &block.instructions {
                out.extend_from_slice(&encode_instruction(instruction, arch));
            }
        }
    }
    out
}

pub fn encode_instruction(instruction: &Instruction, arch: Arch) -> Vec<u8> {
    match arch {
        Arch::X86_64 => x86_64::encode(instruction),
        Arch::Aarch64 => aarch64::encode(instruction),
    }
}
