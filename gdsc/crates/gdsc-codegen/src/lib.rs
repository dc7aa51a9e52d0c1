//! gdsc-codegen — the back half of spec.md §4.4: linear-scan register
//! allocation, the dead-code/constant-fold optimizer, and the three
//! emitters (assembly, object blob, native executable) with their
//! per-target instruction encoders and container writers.
//!
//! `gdsc-ir` owns the AST→IR lowering and the IR data model; this crate
//! takes the resulting [`Module`] read-only from there on: allocate,
//! optimize, emit.

mod alloc;
pub mod emit;
mod error;
mod optimize;
pub mod target;

pub use alloc::{allocate_module, RegisterAllocator};
pub use error::CodeGenError;
pub use emit::{emit_assembly, emit_executable, emit_object};
pub use optimize::{eliminate_dead_code, fold_constants};
pub use target::{Arch, EmitFormat, Os, Platform};

use gdsc_ir::Module;

/// Runs register allocation and the optimizer pipeline over `module` in
/// place, in the order spec.md §4.4 lists them: allocate, then
/// dead-code elimination, then the (no-op) constant-folding hook.
pub fn prepare(module: &mut Module) {
    allocate_module(module);
    eliminate_dead_code(module);
    fold_constants(module);
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdsc_ir::{BasicBlock, Function, Instruction, Opcode, Register, RegisterKind};

    #[test]
    fn prepare_then_emit_assembly_round_trips_a_trivial_function() {
        let mut block = BasicBlock::new("entry");
        let r = Register::new(0, RegisterKind::General, "t0");
        block.push(Instruction::with_immediate(Opcode::Mov, vec![r.clone()], 0));
        block.push(Instruction::nop());
        block.push(Instruction::new(Opcode::Ret, vec![r]));
        let mut function = Function::new("f");
        function.push_block(block);
        let mut module = Module { functions: vec![function] };

        prepare(&mut module);
        let text = emit_assembly(&module);

        assert!(text.starts_with("f:\n"));
        assert!(text.contains("mov"));
        assert!(text.contains("ret"));
        assert!(!text.contains("nop"), "dead-code elimination should have dropped the NOP");
    }

    #[test]
    fn prepare_then_emit_object_blob_has_magic_and_no_nops() {
        let mut block = BasicBlock::new("entry");
        block.push(Instruction::nop());
        block.push(Instruction::new(Opcode::Ret, vec![]));
        let mut function = Function::new("f");
        function.push_block(block);
        let mut module = Module { functions: vec![function] };

        prepare(&mut module);
        let blob = emit_object(&module);
        assert_eq!(&blob[0..5], emit::object::MAGIC);
    }
}
