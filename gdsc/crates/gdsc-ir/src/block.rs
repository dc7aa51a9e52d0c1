//! Basic blocks: a maximal straight-line instruction sequence with a
//! single entry. The successor/predecessor graph is populated
//! exclusively by branch instructions.

use crate::instruction::Instruction;

#[derive(Clone, Debug)]
pub struct BasicBlock {
    pub label: String,
    pub instructions: Vec<Instruction>,
    pub successors: Vec<String>,
    pub predecessors: Vec<String>,
}

impl BasicBlock {
    pub fn new(label: impl Into<String>) -> Self {
        BasicBlock { label: label.into(), instructions: Vec::new(), successors: Vec::new(), predecessors: Vec::new() }
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn add_successor(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.successors.contains(&label) {
            self.successors.push(label);
        }
    }
}
