use std::fmt::Display;

/// The primitive types of the language. Equality is structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeInfo {
    I32,
    F32,
    Bool,
    Void,
}

impl TypeInfo {
    /// Built in type names, registered in the global scope.
    pub const BUILTINS: [(&'static str, TypeInfo); 4] = [
        ("i32", TypeInfo::I32),
        ("f32", TypeInfo::F32),
        ("bool", TypeInfo::Bool),
        ("void", TypeInfo::Void),
    ];
}

impl Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeInfo::I32 => write!(f, "i32"),
            TypeInfo::F32 => write!(f, "f32"),
            TypeInfo::Bool => write!(f, "bool"),
            TypeInfo::Void => write!(f, "void"),
        }
    }
}
