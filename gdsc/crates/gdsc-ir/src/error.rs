//! Errors internal to lowering — a defect in the compiler's own
//! invariants, as opposed to a [`gdsc_util::Diagnostic`] describing a
//! defect in the compiled program. The analyzer already rejects a
//! `break`/`continue` outside a loop before code generation ever runs,
//! so these exist as a last-line check rather than a path callers are
//! expected to hit.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LowerError {
    #[error("`break` outside of any loop")]
    OrphanBreak,
    #[error("`continue` outside of any loop")]
    OrphanContinue,
}
