//! IR functions: an ordered sequence of basic blocks plus the parameter
//! and return-register metadata the calling convention needs.

use crate::block::BasicBlock;
use crate::register::Register;

#[derive(Clone, Debug)]
pub struct Function {
    pub name: String,
    pub blocks: Vec<BasicBlock>,
    pub parameters: Vec<Register>,
    pub return_register: Option<Register>,
    pub stack_size: u32,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Function { name: name.into(), blocks: Vec::new(), parameters: Vec::new(), return_register: None, stack_size: 0 }
    }

    pub fn current_block_mut(&mut self) -> &mut BasicBlock {
        self.blocks.last_mut().expect("function has at least one block once lowering starts")
    }

    pub fn push_block(&mut self, block: BasicBlock) {
        self.blocks.push(block);
    }

    /// Links `from -> to` by recording the successor/predecessor pair on
    /// both blocks, looked up by label.
    pub fn link(&mut self, from_label: &str, to_label: &str) {
        if let Some(from) = self.blocks.iter_mut().find(|b| b.label == from_label) {
            from.add_successor(to_label);
        }
        if let Some(to) = self.blocks.iter_mut().find(|b| b.label == to_label) {
            if !to.predecessors.iter().any(|p| p == from_label) {
                to.predecessors.push(from_label.to_string());
            }
        }
    }

    pub fn all_instructions_mut(&mut self) -> impl Iterator<Item = &mut crate::instruction::Instruction> {
        self.blocks.iter_mut().flat_map(|b| b.instructions.iter_mut())
    }
}
