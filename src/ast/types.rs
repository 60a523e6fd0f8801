//! Type annotations as written in source.
//!
//! Only named types exist, the type checker resolves the name to a
//! `TypeInfo` and caches the result under the annotation's node id.

use std::fmt::Display;

use super::ast::NodeId;

#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub id: NodeId,
    pub name: String,
}

impl Display for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
