//! Optimization passes that run before emission (spec.md §4.4): dead-code
//! elimination removes `NOP` instructions, and constant folding is a
//! reserved hook that does nothing in this minimum implementation.

use gdsc_ir::{Module, Opcode};

/// Strips every `NOP` from every block of every function. `pass`/`break`/
/// `continue` lowering, and the finalization of an already-terminated
/// block, are the two sources of `NOP`s the lowerer emits.
pub fn eliminate_dead_code(module: &mut Module) {
    for function in &mut module.functions {
        for block in &mut function.blocks {
            block.instructions.retain(|i| i.opcode != Opcode::Nop);
        }
    }
}

/// Reserved hook: spec.md §4.4 lists constant folding as a no-op in the
/// minimum implementation. Kept as an explicit pass (rather than omitted)
/// so the optimizer pipeline's shape matches the spec's stated order.
pub fn fold_constants(_module: &mut Module) {}
