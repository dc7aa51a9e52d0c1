//! The proprietary `GDOBJ` object blob (spec.md §4.4): magic `GDOBJ`,
//! a 32-bit function count, then per function `{name_length:u32, name,
//! instruction_count:u32, opcode_id:u32 × N}`, all little-endian.

use gdsc_ir::Module;

pub const MAGIC: &[u8; 5] = b"GDOBJ";

pub fn emit_object(module: &Module) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&(module.functions.len() as u32).to_le_bytes());

    for function in &module.functions {
        let name_bytes = function.name.as_bytes();
        out.extend_from_slice(&(name_bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(name_bytes);

        let instructions: Vec<_> = function.blocks.iter().flat_map(|b| b.instructions.iter()).collect();
        out.extend_from_slice(&(instructions.len() as u32).to_le_bytes());
        for instruction in instructions {
            out.extend_from_slice(&instruction.opcode.id().to_le_bytes());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdsc_ir::{BasicBlock, Function, Instruction, Opcode};

    #[test]
    fn blob_starts_with_magic_and_function_count() {
        let mut block = BasicBlock::new("entry");
        block.push(Instruction::new(Opcode::Ret, vec![]));
        let mut function = Function::new("f");
        function.push_block(block);
        let module = Module { functions: vec![function] };

        let blob = emit_object(&module);
        assert_eq!(&blob[0..5], MAGIC);
        let count = u32::from_le_bytes(blob[5..9].try_into().unwrap());
        assert_eq!(count, 1);
    }

    #[test]
    fn blob_round_trips_function_name_and_opcode_ids() {
        let mut block = BasicBlock::new("entry");
        block.push(Instruction::new(Opcode::Nop, vec![]));
        block.push(Instruction::new(Opcode::Ret, vec![]));
        let mut function = Function::new("fn_a");
        function.push_block(block);
        let module = Module { functions: vec![function] };

        let blob = emit_object(&module);
        let mut cursor = 9usize;
        let name_len = u32::from_le_bytes(blob[cursor..cursor + 4].try_into().unwrap()) as usize;
        cursor += 4;
        assert_eq!(&blob[cursor..cursor + name_len], b"fn_a");
        cursor += name_len;
        let inst_count = u32::from_le_bytes(blob[cursor..cursor + 4].try_into().unwrap());
        assert_eq!(inst_count, 2);
        cursor += 4;
        let first_opcode = u32::from_le_bytes(blob[cursor..cursor + 4].try_into().unwrap());
        assert_eq!(first_opcode, Opcode::Nop.id());
    }
}
