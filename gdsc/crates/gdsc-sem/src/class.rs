//! Global class table: `name -> ClassInfo`.

use gdsc_util::Symbol;
use rustc_hash::FxHashMap;

use crate::FunctionSignature;
use crate::scope::SymbolEntry;

#[derive(Debug)]
pub struct ClassInfo {
    pub name: Symbol,
    pub base_class_name: Option<Symbol>,
    pub members: FxHashMap<Symbol, SymbolEntry>,
    pub methods: FxHashMap<Symbol, FunctionSignature>,
    pub signals: Vec<Symbol>,
    pub declaration_line: u32,
}

#[derive(Debug, Default)]
pub struct ClassTable {
    classes: FxHashMap<Symbol, ClassInfo>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, info: ClassInfo) {
        self.classes.insert(info.name, info);
    }

    pub fn get(&self, name: Symbol) -> Option<&ClassInfo> {
        self.classes.get(&name)
    }

    pub fn get_mut(&mut self, name: Symbol) -> Option<&mut ClassInfo> {
        self.classes.get_mut(&name)
    }

    pub fn contains(&self, name: Symbol) -> bool {
        self.classes.contains_key(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &ClassInfo)> {
        self.classes.iter()
    }
}
