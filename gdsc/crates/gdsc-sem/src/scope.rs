//! Scope tree for name resolution.
//!
//! Scopes form a tree rooted at a global scope created at analyzer
//! start. Lookup walks the parent chain; a definition is rejected if it
//! would shadow a binding already present in the *same* scope.

use gdsc_util::{define_idx, Idx, IndexVec, Symbol};
use rustc_hash::FxHashMap;

use crate::types::TypeInfo;
use crate::FunctionSignature;

define_idx!(ScopeId);

#[derive(Clone, Debug)]
pub struct SymbolEntry {
    pub name: Symbol,
    pub ty: TypeInfo,
    pub is_constant: bool,
    pub is_static: bool,
    pub is_initialized: bool,
    pub declaration_line: u32,
}

#[derive(Debug)]
pub struct Scope {
    pub symbols: FxHashMap<Symbol, SymbolEntry>,
    pub functions: FxHashMap<Symbol, FunctionSignature>,
    pub parent: Option<ScopeId>,
}

/// A tree of scopes owned by the analyzer; child scopes are conceptually
/// dropped on block exit, but since every scope is looked up
/// only through its id while its block is being walked, we simply stop
/// referencing it rather than physically remove it from the arena.
pub struct ScopeTree {
    scopes: IndexVec<ScopeId, Scope>,
    current: ScopeId,
}

impl ScopeTree {
    pub fn new() -> Self {
        let mut scopes = IndexVec::new();
        let root = scopes.push(Scope { symbols: FxHashMap::default(), functions: FxHashMap::default(), parent: None });
        ScopeTree { scopes, current: root }
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    pub fn enter_scope(&mut self) -> ScopeId {
        let parent = self.current;
        let id = self.scopes.push(Scope { symbols: FxHashMap::default(), functions: FxHashMap::default(), parent: Some(parent) });
        self.current = id;
        id
    }

    /// Exits the current scope back to its parent; a no-op at the root.
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.current = parent;
        }
    }

    /// Defines a symbol in the current scope. Returns `false` without
    /// modifying the scope if `name` is already bound *in this scope*
    /// (shadowing a parent binding is allowed).
    pub fn define(&mut self, entry: SymbolEntry) -> bool {
        let scope = &mut self.scopes[self.current];
        if scope.symbols.contains_key(&entry.name) {
            return false;
        }
        scope.symbols.insert(entry.name, entry);
        true
    }

    pub fn define_function(&mut self, name: Symbol, sig: FunctionSignature) -> bool {
        let scope = &mut self.scopes[self.current];
        if scope.functions.contains_key(&name) {
            return false;
        }
        scope.functions.insert(name, sig);
        true
    }

    /// Walks the parent chain starting at the current scope.
    pub fn resolve(&self, name: Symbol) -> Option<&SymbolEntry> {
        let mut id = self.current;
        loop {
            if let Some(entry) = self.scopes[id].symbols.get(&name) {
                return Some(entry);
            }
            match self.scopes[id].parent {
                Some(parent) => id = parent,
                None => return None,
            }
        }
    }

    pub fn resolve_mut(&mut self, name: Symbol) -> Option<&mut SymbolEntry> {
        let mut id = self.current;
        loop {
            if self.scopes[id].symbols.contains_key(&name) {
                return self.scopes[id].symbols.get_mut(&name);
            }
            match self.scopes[id].parent {
                Some(parent) => id = parent,
                None => return None,
            }
        }
    }

    pub fn resolve_function(&self, name: Symbol) -> Option<&FunctionSignature> {
        let mut id = self.current;
        loop {
            if let Some(sig) = self.scopes[id].functions.get(&name) {
                return Some(sig);
            }
            match self.scopes[id].parent {
                Some(parent) => id = parent,
                None => return None,
            }
        }
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeInfo;

    fn entry(name: &str) -> SymbolEntry {
        SymbolEntry {
            name: Symbol::intern(name),
            ty: TypeInfo::int(),
            is_constant: false,
            is_static: false,
            is_initialized: true,
            declaration_line: 1,
        }
    }

    #[test]
    fn symbol_visible_in_descendant_scope_but_not_in_ancestor() {
        let mut tree = ScopeTree::new();
        assert!(tree.define(entry("outer")));
        tree.enter_scope();
        assert!(tree.resolve(Symbol::intern("outer")).is_some());
        assert!(tree.define(entry("inner")));
        tree.exit_scope();
        assert!(tree.resolve(Symbol::intern("inner")).is_none());
    }

    #[test]
    fn redefining_in_the_same_scope_is_rejected() {
        let mut tree = ScopeTree::new();
        assert!(tree.define(entry("x")));
        assert!(!tree.define(entry("x")));
    }

    #[test]
    fn shadowing_a_parent_binding_in_a_child_scope_is_allowed() {
        let mut tree = ScopeTree::new();
        assert!(tree.define(entry("x")));
        tree.enter_scope();
        assert!(tree.define(entry("x")));
    }
}
