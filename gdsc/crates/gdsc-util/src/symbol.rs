//! String interning.
//!
//! [`Symbol`] is a 4-byte handle into a global, append-only string table.
//! Two symbols compare equal iff the strings they were interned from are
//! equal, and that comparison is a single integer comparison rather than a
//! byte-by-byte one. Interned strings are never freed: the compiler is a
//! short-lived process and the total number of distinct identifiers in a
//! source file is small, so leaking them for a `'static` lifetime is the
//! simplest correct design.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::{Mutex, OnceLock};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

struct Table {
    names: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

fn table() -> &'static Mutex<Table> {
    static TABLE: OnceLock<Mutex<Table>> = OnceLock::new();
    TABLE.get_or_init(|| {
        Mutex::new(Table {
            names: FxHashMap::default(),
            strings: Vec::new(),
        })
    })
}

impl Symbol {
    pub fn intern(s: &str) -> Symbol {
        let mut table = table().lock().unwrap();
        if let Some(&id) = table.names.get(s) {
            return Symbol(id);
        }
        let leaked: &'static str = Box::leak(s.to_string().into_boxed_str());
        let id = table.strings.len() as u32;
        table.strings.push(leaked);
        table.names.insert(leaked, id);
        Symbol(id)
    }

    pub fn as_str(self) -> &'static str {
        table().lock().unwrap().strings[self.0 as usize]
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_interns_to_same_symbol() {
        assert_eq!(Symbol::intern("hello"), Symbol::intern("hello"));
        assert_ne!(Symbol::intern("hello"), Symbol::intern("world"));
    }

    #[test]
    fn round_trips_text() {
        let s = Symbol::intern("class_name");
        assert_eq!(s.as_str(), "class_name");
    }
}
