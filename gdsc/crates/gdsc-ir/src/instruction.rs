//! Three-address instructions: one opcode, its register operands, and at
//! most one of an immediate or a label.

use crate::register::Register;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Mov,
    Load,
    Store,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    FAdd,
    FSub,
    FMul,
    FDiv,
    And,
    Or,
    Xor,
    Not,
    Cmp,
    FCmp,
    Jmp,
    Je,
    Jne,
    Jl,
    Jle,
    Jg,
    Jge,
    Call,
    Ret,
    Push,
    Pop,
    Nop,
    Label,
}

impl Opcode {
    /// Lowercase mnemonic used by the textual assembly emitter.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Mov => "mov",
            Opcode::Load => "load",
            Opcode::Store => "store",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Mod => "mod",
            Opcode::FAdd => "fadd",
            Opcode::FSub => "fsub",
            Opcode::FMul => "fmul",
            Opcode::FDiv => "fdiv",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Xor => "xor",
            Opcode::Not => "not",
            Opcode::Cmp => "cmp",
            Opcode::FCmp => "fcmp",
            Opcode::Jmp => "jmp",
            Opcode::Je => "je",
            Opcode::Jne => "jne",
            Opcode::Jl => "jl",
            Opcode::Jle => "jle",
            Opcode::Jg => "jg",
            Opcode::Jge => "jge",
            Opcode::Call => "call",
            Opcode::Ret => "ret",
            Opcode::Push => "push",
            Opcode::Pop => "pop",
            Opcode::Nop => "nop",
            Opcode::Label => "label",
        }
    }

    pub fn is_jump(self) -> bool {
        matches!(self, Opcode::Jmp | Opcode::Je | Opcode::Jne | Opcode::Jl | Opcode::Jle | Opcode::Jg | Opcode::Jge)
    }

    /// Stable numeric id in declaration order, used as the `opcode_id`
    /// field of the `GDOBJ` object format (gdsc-codegen).
    pub fn id(self) -> u32 {
        self as u32
    }
}

#[derive(Clone, Debug)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Vec<Register>,
    pub label: Option<String>,
    pub immediate: i64,
    pub has_immediate: bool,
}

impl Instruction {
    pub fn new(opcode: Opcode, operands: Vec<Register>) -> Self {
        Instruction { opcode, operands, label: None, immediate: 0, has_immediate: false }
    }

    pub fn with_immediate(opcode: Opcode, operands: Vec<Register>, immediate: i64) -> Self {
        Instruction { opcode, operands, label: None, immediate, has_immediate: true }
    }

    pub fn jump(opcode: Opcode, label: impl Into<String>) -> Self {
        Instruction { opcode, operands: Vec::new(), label: Some(label.into()), immediate: 0, has_immediate: false }
    }

    pub fn label(name: impl Into<String>) -> Self {
        Instruction { opcode: Opcode::Label, operands: Vec::new(), label: Some(name.into()), immediate: 0, has_immediate: false }
    }

    pub fn nop() -> Self {
        Instruction { opcode: Opcode::Nop, operands: Vec::new(), label: None, immediate: 0, has_immediate: false }
    }

    /// Textual rendering: mnemonic + operand names. A `LABEL` instruction
    /// prints `label:`.
    pub fn render(&self) -> String {
        if self.opcode == Opcode::Label {
            return format!("{}:", self.label.as_deref().unwrap_or(""));
        }
        let mut operand_names: Vec<String> = self.operands.iter().map(|r| r.name.clone()).collect();
        if self.has_immediate {
            operand_names.push(self.immediate.to_string());
        } else if let Some(label) = &self.label {
            operand_names.push(label.clone());
        }
        if operand_names.is_empty() {
            self.opcode.mnemonic().to_string()
        } else {
            format!("{} {}", self.opcode.mnemonic(), operand_names.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::RegisterKind;

    #[test]
    fn label_instruction_renders_with_trailing_colon() {
        let i = Instruction::label("loop_0");
        assert_eq!(i.render(), "loop_0:");
    }

    #[test]
    fn mov_immediate_renders_mnemonic_and_value() {
        let dest = Register::new(0, RegisterKind::General, "rax");
        let i = Instruction::with_immediate(Opcode::Mov, vec![dest], 0);
        assert_eq!(i.render(), "mov rax, 0");
    }
}
