//! IR registers.
//!
//! Before allocation a register is virtual, minted with an ever-increasing
//! id; the allocator in `gdsc-codegen` later rebinds virtual operands to a
//! physical register of the same kind.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegisterKind {
    General,
    Float,
    Virtual,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Register {
    pub id: u32,
    pub kind: RegisterKind,
    pub name: String,
    pub allocated: bool,
}

impl Register {
    pub fn new(id: u32, kind: RegisterKind, name: impl Into<String>) -> Self {
        Register { id, kind, name: name.into(), allocated: false }
    }

    pub fn is_virtual(&self) -> bool {
        self.kind == RegisterKind::Virtual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_register_reports_as_virtual() {
        let r = Register::new(0, RegisterKind::Virtual, "v0");
        assert!(r.is_virtual());
    }
}
