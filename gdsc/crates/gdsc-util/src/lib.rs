//! gdsc-util — interning, source locations, and diagnostics shared by
//! every pass of the gdscript-compiler pipeline.

mod diagnostic;
mod index_vec;
mod span;
mod symbol;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use index_vec::{Idx, IndexVec};
pub use span::Span;
pub use symbol::Symbol;

/// A single input file, named for diagnostic rendering (SPEC_FULL.md §11).
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        SourceFile { name: name.into(), content: content.into() }
    }
}
