//! Textual assembly emission (spec.md §4.4): one function label per
//! function, followed by each block's instructions rendered one per line.

use gdsc_ir::Module;

pub fn emit_assembly(module: &Module) -> String {
    let mut out = String::new();
    for function in &module.functions {
        out.push_str(&function.name);
        out.push_str(":\n");
        for block in &function.blocks {
            for instruction in &block.instructions {
                out.push_str(&instruction.render());
                out.push('\n');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdsc_ir::{BasicBlock, Function, Instruction, Opcode, Register, RegisterKind};

    #[test]
    fn assembly_contains_function_label_and_ret() {
        let mut block = BasicBlock::new("entry");
        let zero = Register::new(0, RegisterKind::General, "rax");
        block.push(Instruction::with_immediate(Opcode::Mov, vec![zero.clone()], 0));
        block.push(Instruction::new(Opcode::Ret, vec![zero]));
        let mut function = Function::new("f");
        function.push_block(block);
        let module = Module { functions: vec![function] };

        let text = emit_assembly(&module);
        assert!(text.contains("f:\n"));
        assert!(text.contains("mov rax, 0"));
        assert!(text.contains("ret rax"));
    }
}
