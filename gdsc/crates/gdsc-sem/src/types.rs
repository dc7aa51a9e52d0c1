//! Types and the compatibility/result rules over them.

use gdsc_util::Symbol;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BaseKind {
    Void,
    Int,
    Float,
    String,
    Bool,
    Array,
    Dict,
    Vector2,
    Vector3,
    Node,
    Object,
    Variant,
    Custom,
    Lambda,
    Unknown,
}

/// Equality ignores `generic_params`: two `Array[int]` and
/// `Array[String]` `TypeInfo`s compare equal as long as their
/// `base_kind`/`custom_name` match.
#[derive(Clone, Debug)]
pub struct TypeInfo {
    pub base_kind: BaseKind,
    pub custom_name: Option<Symbol>,
    pub generic_params: Vec<TypeInfo>,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.base_kind == other.base_kind && self.custom_name == other.custom_name
    }
}
impl Eq for TypeInfo {}

impl TypeInfo {
    pub fn simple(base_kind: BaseKind) -> Self {
        TypeInfo { base_kind, custom_name: None, generic_params: Vec::new() }
    }

    pub fn custom(name: Symbol) -> Self {
        TypeInfo { base_kind: BaseKind::Custom, custom_name: Some(name), generic_params: Vec::new() }
    }

    pub fn void() -> Self {
        Self::simple(BaseKind::Void)
    }
    pub fn int() -> Self {
        Self::simple(BaseKind::Int)
    }
    pub fn float() -> Self {
        Self::simple(BaseKind::Float)
    }
    pub fn string() -> Self {
        Self::simple(BaseKind::String)
    }
    pub fn bool() -> Self {
        Self::simple(BaseKind::Bool)
    }
    pub fn array() -> Self {
        Self::simple(BaseKind::Array)
    }
    pub fn dict() -> Self {
        Self::simple(BaseKind::Dict)
    }
    pub fn variant() -> Self {
        Self::simple(BaseKind::Variant)
    }
    pub fn unknown() -> Self {
        Self::simple(BaseKind::Unknown)
    }

    pub fn is_variant(&self) -> bool {
        self.base_kind == BaseKind::Variant
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.base_kind, BaseKind::Int | BaseKind::Float)
    }

    /// Named after the source text the parser stored for a type
    /// annotation (e.g. `"Array[String]"`); resolves to the base name
    /// only, since `TypeInfo` equality already ignores generics.
    pub fn from_annotation(text: &str, lookup_custom: impl Fn(&str) -> bool) -> TypeInfo {
        let base = text.split('[').next().unwrap_or(text).trim();
        match base {
            "void" => TypeInfo::void(),
            "int" => TypeInfo::int(),
            "float" => TypeInfo::float(),
            "string" | "String" => TypeInfo::string(),
            "bool" => TypeInfo::bool(),
            "array" | "Array" => TypeInfo::array(),
            "dict" | "dictionary" | "Dictionary" => TypeInfo::dict(),
            "vector2" | "Vector2" => TypeInfo::simple(BaseKind::Vector2),
            "vector3" | "Vector3" => TypeInfo::simple(BaseKind::Vector3),
            "node" | "Node" => TypeInfo::simple(BaseKind::Node),
            "object" | "Object" => TypeInfo::simple(BaseKind::Object),
            "variant" | "Variant" => TypeInfo::variant(),
            other if lookup_custom(other) => TypeInfo::custom(Symbol::intern(other)),
            _ => TypeInfo::unknown(),
        }
    }
}

/// Assignment/parameter-passing compatibility.
pub fn is_compatible(target: &TypeInfo, source: &TypeInfo) -> bool {
    if target == source {
        return true;
    }
    if target.is_variant() || source.is_variant() {
        return true;
    }
    if target.is_numeric() && source.is_numeric() {
        return true;
    }
    if target.base_kind == BaseKind::String {
        return true; // every type stringifies
    }
    matches!(
        (target.base_kind, source.base_kind),
        (BaseKind::Node, BaseKind::Object) | (BaseKind::Object, BaseKind::Node)
    )
}

/// Result type of a binary operation.
pub fn binary_result_type(op: gdsc_par::ast::BinOp, left: &TypeInfo, right: &TypeInfo) -> TypeInfo {
    use gdsc_par::ast::BinOp::*;

    if left.is_variant() || right.is_variant() {
        if matches!(op, Eq | NotEq | Lt | Le | Gt | Ge | And | Or) {
            return TypeInfo::bool();
        }
        return TypeInfo::variant();
    }

    match op {
        Add if left.base_kind == BaseKind::String || right.base_kind == BaseKind::String => TypeInfo::string(),
        Add | Sub | Mul | Div => {
            if left.base_kind == BaseKind::Float || right.base_kind == BaseKind::Float {
                TypeInfo::float()
            } else {
                TypeInfo::int()
            }
        }
        Mod if left.base_kind == BaseKind::String && right.base_kind == BaseKind::Array => TypeInfo::string(),
        Mod => {
            if left.base_kind == BaseKind::Float || right.base_kind == BaseKind::Float {
                TypeInfo::float()
            } else {
                TypeInfo::int()
            }
        }
        Eq | NotEq | Lt | Le | Gt | Ge => TypeInfo::bool(),
        And | Or => TypeInfo::bool(),
        In => TypeInfo::bool(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdsc_par::ast::BinOp;

    #[test]
    fn variant_is_compatible_with_everything() {
        assert!(is_compatible(&TypeInfo::variant(), &TypeInfo::int()));
        assert!(is_compatible(&TypeInfo::string(), &TypeInfo::variant()));
    }

    #[test]
    fn int_and_float_are_mutually_compatible() {
        assert!(is_compatible(&TypeInfo::int(), &TypeInfo::float()));
        assert!(is_compatible(&TypeInfo::float(), &TypeInfo::int()));
    }

    #[test]
    fn node_and_object_are_mutually_compatible() {
        assert!(is_compatible(&TypeInfo::simple(BaseKind::Node), &TypeInfo::simple(BaseKind::Object)));
    }

    #[test]
    fn equality_ignores_generic_params() {
        let a = TypeInfo { base_kind: BaseKind::Array, custom_name: None, generic_params: vec![TypeInfo::int()] };
        let b = TypeInfo { base_kind: BaseKind::Array, custom_name: None, generic_params: vec![TypeInfo::string()] };
        assert_eq!(a, b);
    }

    #[test]
    fn arithmetic_widens_to_float_when_either_operand_is_float() {
        let result = binary_result_type(BinOp::Add, &TypeInfo::int(), &TypeInfo::float());
        assert_eq!(result, TypeInfo::float());
    }

    #[test]
    fn string_concatenation_yields_string() {
        let result = binary_result_type(BinOp::Add, &TypeInfo::string(), &TypeInfo::int());
        assert_eq!(result, TypeInfo::string());
    }

    #[test]
    fn string_percent_array_yields_string() {
        let result = binary_result_type(BinOp::Mod, &TypeInfo::string(), &TypeInfo::array());
        assert_eq!(result, TypeInfo::string());
    }
}
