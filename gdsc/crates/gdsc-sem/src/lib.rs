//! gdsc-sem — the semantic analyzer.
//!
//! Walks the AST `gdsc-par` produces, builds the scope tree and the
//! global class table, infers and checks types, and collects
//! diagnostics. Nothing here mutates the AST; every result lives beside
//! it in [`AnalysisResult`].

mod analyzer;
mod class;
mod scope;
pub mod types;

pub use analyzer::{analyze, AnalysisResult};
pub use class::{ClassInfo, ClassTable};
pub use scope::{Scope, ScopeId, ScopeTree, SymbolEntry};
pub use types::TypeInfo;

use gdsc_util::Symbol;

#[derive(Clone, Debug)]
pub struct FunctionSignature {
    pub name: Symbol,
    pub parameter_types: Vec<TypeInfo>,
    pub return_type: TypeInfo,
    pub is_static: bool,
    pub is_variadic: bool,
    pub declaration_line: u32,
}
