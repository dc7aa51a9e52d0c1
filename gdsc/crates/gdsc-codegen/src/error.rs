//! Errors internal to code generation: a defect in the compiler's own
//! process (an unsupported target, an emission file-write failure), as
//! opposed to a diagnostic describing a defect in the compiled program.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeGenError {
    #[error("unsupported target '{0}'")]
    UnsupportedTarget(String),

    #[error("failed to open output file '{path}': {source}")]
    FileOpen { path: String, source: std::io::Error },
}
