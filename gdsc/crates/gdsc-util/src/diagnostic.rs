//! Diagnostics sink shared by every pass (spec.md §7).
//!
//! Each pass owns a `Handler`, appends to it in source order as it walks
//! its input, and never removes or reorders entries afterward. The driver
//! queries [`Handler::has_errors`] after each phase and stops the pipeline
//! on the first phase that reports one (spec.md §7 propagation policy).

use crate::span::Span;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Diagnostic { level: Level::Error, message: message.into(), span }
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Diagnostic { level: Level::Warning, message: message.into(), span }
    }

    /// Render as `<file>:<line>:<column>: error: <message>`, per SPEC_FULL.md §11.
    pub fn render(&self, file_name: &str) -> String {
        format!(
            "{}:{}:{}: {}: {}",
            file_name, self.span.line, self.span.column, self.level, self.message
        )
    }
}

/// Append-only diagnostics collector for a single compiler pass.
#[derive(Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::error(message, span));
    }

    pub fn warning(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::warning(message, span));
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == Level::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.level == Level::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.level == Level::Warning).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Merge another handler's diagnostics in, preserving order (this
    /// handler's entries first). Used by the driver to fold a later
    /// phase's handler into a single running report.
    pub fn extend(&mut self, other: Handler) {
        self.diagnostics.extend(other.diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_errors_ignores_warnings() {
        let mut h = Handler::new();
        h.warning("heterogeneous ternary branches", Span::new(1, 1));
        assert!(!h.has_errors());
        h.error("undefined variable 'q'", Span::new(1, 7));
        assert!(h.has_errors());
        assert_eq!(h.error_count(), 1);
        assert_eq!(h.warning_count(), 1);
    }

    #[test]
    fn preserves_insertion_order() {
        let mut h = Handler::new();
        h.error("a", Span::new(1, 1));
        h.error("b", Span::new(2, 1));
        let msgs: Vec<_> = h.diagnostics().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(msgs, ["a", "b"]);
    }
}
