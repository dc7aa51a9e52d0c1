//! Linear-scan register allocation (spec.md §4.4), simplified: a pool of
//! 8 general-purpose and 8 float physical registers, a free/allocated
//! list per pool, and a finalization pass that rebinds every operand a
//! per-function scan couldn't fit into the pool.

use rustc_hash::FxHashMap;

use gdsc_ir::{Function, Module, Register, RegisterKind};

const POOL_SIZE: u32 = 8;

/// Tracks which of the 8 physical slots of a kind are currently checked
/// out, mirroring `allocateRegister`/`freeRegister` from spec.md §4.4.
pub struct RegisterAllocator {
    general_free: Vec<u32>,
    float_free: Vec<u32>,
    next_virtual_id: u32,
}

impl RegisterAllocator {
    pub fn new() -> Self {
        RegisterAllocator {
            general_free: (0..POOL_SIZE).rev().collect(),
            float_free: (0..POOL_SIZE).rev().collect(),
            next_virtual_id: POOL_SIZE * 2,
        }
    }

    /// Returns the first free physical register of `kind`, marking it
    /// allocated; mints a fresh virtual register with an increasing id
    /// if the pool is exhausted.
    pub fn allocate(&mut self, kind: RegisterKind) -> Register {
        let (free, prefix) = match kind {
            RegisterKind::Float => (&mut self.float_free, "f"),
            _ => (&mut self.general_free, "r"),
        };
        if let Some(id) = free.pop() {
            return Register { id, kind, name: format!("{}{}", prefix, id), allocated: true };
        }
        let id = self.next_virtual_id;
        self.next_virtual_id += 1;
        Register { id, kind: RegisterKind::Virtual, name: format!("v{}", id), allocated: false }
    }

    /// Returns a physical register to its pool. A virtual (overflow)
    /// register has nothing to free.
    pub fn free(&mut self, reg: &Register) {
        if !reg.allocated {
            return;
        }
        let free = match reg.kind {
            RegisterKind::Float => &mut self.float_free,
            _ => &mut self.general_free,
        };
        if reg.id < POOL_SIZE && !free.contains(&reg.id) {
            free.push(reg.id);
        }
    }
}

impl Default for RegisterAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the allocator over every function in `module`, then finalizes
/// any operand that didn't get a physical register during its own
/// function's pass.
pub fn allocate_module(module: &mut Module) {
    for function in &mut module.functions {
        allocate_function(function);
    }
    finalize(module);
}

/// Per-function linear scan: walks every instruction in block order,
/// assigning each distinct virtual id (keyed by the IR's symbolic
/// register id) a physical register on first sight and freeing it once
/// the register's last use in this function has been passed.
fn allocate_function(function: &mut Function) {
    let mut last_use: FxHashMap<u32, usize> = FxHashMap::default();
    let mut index = 0usize;
    for block in &function.blocks {
        for instruction in &block.instructions {
            for operand in &instruction.operands {
                last_use.insert(operand.id, index);
            }
            index += 1;
        }
    }

    let mut allocator = RegisterAllocator::new();
    let mut assigned: FxHashMap<u32, Register> = FxHashMap::default();
    let mut index = 0usize;
    for block in &mut function.blocks {
        for instruction in &mut block.instructions {
            for operand in &mut instruction.operands {
                let original_id = operand.id;
                let physical = assigned
                    .entry(original_id)
                    .or_insert_with(|| allocator.allocate(operand.kind))
                    .clone();
                *operand = physical;

                if last_use.get(&original_id) == Some(&index) {
                    if let Some(reg) = assigned.get(&original_id) {
                        allocator.free(reg);
                    }
                }
            }
            index += 1;
        }
    }
}

/// The spec's explicit whole-module finalization step: any operand that
/// is still a [`RegisterKind::Virtual`] overflow id (its home function
/// ran the pool dry) is rebound to the first free physical register of
/// the same kind, cycling through the fixed-size pool — this pass
/// doesn't re-derive liveness, it just guarantees every operand the
/// emitters see carries a nameable physical register.
fn finalize(module: &mut Module) {
    let mut general_cursor = 0u32;
    let mut float_cursor = 0u32;
    let mut rebound: FxHashMap<u32, Register> = FxHashMap::default();

    for function in &mut module.functions {
        for block in &mut function.blocks {
            for instruction in &mut block.instructions {
                for operand in &mut instruction.operands {
                    if operand.allocated {
                        continue;
                    }
                    let physical = rebound.entry(operand.id).or_insert_with(|| {
                        let (cursor, prefix) = match operand.kind {
                            RegisterKind::Float => (&mut float_cursor, "f"),
                            _ => (&mut general_cursor, "r"),
                        };
                        let slot = *cursor % POOL_SIZE;
                        *cursor += 1;
                        Register { id: slot, kind: operand.kind, name: format!("{}{}", prefix, slot), allocated: true }
                    });
                    *operand = physical.clone();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdsc_ir::{BasicBlock, Instruction, Opcode, RegisterKind};

    #[test]
    fn allocator_reuses_pool_before_minting_virtual() {
        let mut allocator = RegisterAllocator::new();
        let regs: Vec<_> = (0..8).map(|_| allocator.allocate(RegisterKind::General)).collect();
        assert!(regs.iter().all(|r| r.allocated));
        let overflow = allocator.allocate(RegisterKind::General);
        assert!(!overflow.allocated);
        assert_eq!(overflow.kind, RegisterKind::Virtual);
    }

    #[test]
    fn freeing_makes_a_slot_available_again() {
        let mut allocator = RegisterAllocator::new();
        let first = allocator.allocate(RegisterKind::General);
        allocator.free(&first);
        let second = allocator.allocate(RegisterKind::General);
        assert!(second.allocated);
    }

    #[test]
    fn allocate_function_assigns_physical_registers_within_pool() {
        let mut function = Function::new("f");
        let mut block = BasicBlock::new("entry");
        let r0 = Register::new(0, RegisterKind::General, "a_0");
        block.push(Instruction::with_immediate(Opcode::Mov, vec![r0.clone()], 1));
        block.push(Instruction::new(Opcode::Ret, vec![r0]));
        function.push_block(block);

        allocate_function(&mut function);

        for instruction in &function.blocks[0].instructions {
            for operand in &instruction.operands {
                assert!(operand.allocated);
                assert!(operand.id < POOL_SIZE);
            }
        }
    }

    #[test]
    fn finalize_rebinds_overflow_registers() {
        let mut module = Module { functions: vec![Function::new("f")] };
        let mut block = BasicBlock::new("entry");
        let overflow = Register { id: 999, kind: RegisterKind::Virtual, name: "v999".into(), allocated: false };
        block.push(Instruction::new(Opcode::Ret, vec![overflow]));
        module.functions[0].push_block(block);

        finalize(&mut module);

        let operand = &module.functions[0].blocks[0].instructions[0].operands[0];
        assert!(operand.allocated);
        assert!(operand.id < POOL_SIZE);
    }
}
