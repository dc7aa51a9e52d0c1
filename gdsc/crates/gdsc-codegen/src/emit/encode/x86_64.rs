//! x86-64 instruction encodings, fixed to the RAX operand. Covers `MOV`,
//! `ADD`, `SUB` (each in register-register and register-immediate form),
//! `CALL`, `RET`, `PUSH`, `POP`, `NOP`; anything else encodes as a single
//! `NOP` byte.

use gdsc_ir::{Instruction, Opcode};

const NOP: u8 = 0x90;

pub fn encode(instruction: &Instruction) -> Vec<u8> {
    match instruction.opcode {
        Opcode::Mov if instruction.has_immediate => mov_imm(instruction.immediate as i32),
        Opcode::Mov => mov_reg_reg(),
        Opcode::Add if instruction.has_immediate => add_imm(instruction.immediate as i32),
        Opcode::Add => add_reg_reg(),
        Opcode::Sub if instruction.has_immediate => sub_imm(instruction.immediate as i32),
        Opcode::Sub => sub_reg_reg(),
        Opcode::Call => call(),
        Opcode::Ret => vec![0xc3],
        Opcode::Push => vec![0x50],
        Opcode::Pop => vec![0x58],
        Opcode::Nop | Opcode::Label => vec![NOP],
        _ => vec![NOP],
    }
}

/// `mov rax, imm32` — `48 c7 c0 <imm32 LE>`.
fn mov_imm(imm: i32) -> Vec<u8> {
    let mut bytes = vec![0x48, 0xc7, 0xc0];
    bytes.extend_from_slice(&imm.to_le_bytes());
    bytes
}

/// `mov rax, rax` — `48 89 c0`.
fn mov_reg_reg() -> Vec<u8> {
    vec![0x48, 0x89, 0xc0]
}

/// `add rax, imm32` — `48 05 <imm32 LE>`.
fn add_imm(imm: i32) -> Vec<u8> {
    let mut bytes = vec![0x48, 0x05];
    bytes.extend_from_slice(&imm.to_le_bytes());
    bytes
}

/// `add rax, rax` — `48 01 c0`.
fn add_reg_reg() -> Vec<u8> {
    vec![0x48, 0x01, 0xc0]
}

/// `sub rax, imm32` — `48 2d <imm32 LE>`.
fn sub_imm(imm: i32) -> Vec<u8> {
    let mut bytes = vec![0x48, 0x2d];
    bytes.extend_from_slice(&imm.to_le_bytes());
    bytes
}

/// `sub rax, rax` — `48 29 c0`.
fn sub_reg_reg() -> Vec<u8> {
    vec![0x48, 0x29, 0xc0]
}

/// `call rel32` — `e8 <rel32 = 0>`; the target isn't linked, so the
/// relative displacement is always the placeholder `0`.
fn call() -> Vec<u8> {
    vec![0xe8, 0x00, 0x00, 0x00, 0x00]
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdsc_ir::Register;

    fn reg(name: &str) -> Register {
        Register::new(0, gdsc_ir::RegisterKind::General, name)
    }

    #[test]
    fn ret_encodes_to_single_byte() {
        let i = Instruction::new(Opcode::Ret, vec![reg("rax")]);
        assert_eq!(encode(&i), vec![0xc3]);
    }

    #[test]
    fn mov_immediate_has_rex_w_prefix() {
        let i = Instruction::with_immediate(Opcode::Mov, vec![reg("rax")], 0);
        assert_eq!(encode(&i), vec![0x48, 0xc7, 0xc0, 0, 0, 0, 0]);
    }

    #[test]
    fn unknown_opcode_falls_back_to_nop() {
        let i = Instruction::new(Opcode::FCmp, vec![]);
        assert_eq!(encode(&i), vec![NOP]);
    }
}
