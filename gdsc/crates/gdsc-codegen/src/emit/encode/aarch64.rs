//! AArch64 instruction encodings, fixed to the X0 operand. `PUSH`/`POP`
//! have no AArch64 counterpart in this ISA subset (spec.md §4.4: "x86
//! only") and fall back to `NOP`, like any other unhandled opcode.

use gdsc_ir::{Instruction, Opcode};

const NOP: u32 = 0xd503201f;

pub fn encode(instruction: &Instruction) -> Vec<u8> {
    let word = match instruction.opcode {
        Opcode::Mov if instruction.has_immediate => movz_x0(instruction.immediate as u32),
        Opcode::Mov => 0xaa0003e0, // mov x0, x0
        Opcode::Add if instruction.has_immediate => add_imm_x0(instruction.immediate as u32),
        Opcode::Add => 0x8b000000, // add x0, x0, x0
        Opcode::Sub if instruction.has_immediate => sub_imm_x0(instruction.immediate as u32),
        Opcode::Sub => 0xcb000000, // sub x0, x0, x0
        Opcode::Call => 0x94000000, // bl #0
        Opcode::Ret => 0xd65f03c0,
        Opcode::Nop | Opcode::Label | Opcode::Push | Opcode::Pop => NOP,
        _ => NOP,
    };
    word.to_le_bytes().to_vec()
}

/// `movz x0, #imm16` (hw = 0): `1101 0010 1 00 imm16 00000`.
fn movz_x0(imm: u32) -> u32 {
    0xd2800000 | ((imm & 0xffff) << 5)
}

/// `add x0, x0, #imm12` (immediate form, Rn = Rd = 0).
fn add_imm_x0(imm: u32) -> u32 {
    0x91000000 | ((imm & 0xfff) << 10)
}

/// `sub x0, x0, #imm12` (immediate form, Rn = Rd = 0).
fn sub_imm_x0(imm: u32) -> u32 {
    0xd1000000 | ((imm & 0xfff) << 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdsc_ir::Register;

    fn reg(name: &str) -> Register {
        Register::new(0, gdsc_ir::RegisterKind::General, name)
    }

    #[test]
    fn ret_encodes_to_four_bytes() {
        let i = Instruction::new(Opcode::Ret, vec![reg("x0")]);
        assert_eq!(encode(&i), 0xd65f03c0u32.to_le_bytes().to_vec());
    }

    #[test]
    fn push_falls_back_to_nop_on_aarch64() {
        let i = Instruction::new(Opcode::Push, vec![reg("x0")]);
        assert_eq!(encode(&i), NOP.to_le_bytes().to_vec());
    }

    #[test]
    fn movz_embeds_the_immediate() {
        let i = Instruction::with_immediate(Opcode::Mov, vec![reg("x0")], 5);
        let word = u32::from_le_bytes(encode(&i).try_into().unwrap());
        assert_eq!(word, 0xd2800000 | (5 << 5));
    }
}
