use std::fmt::Display;

use super::type_info::TypeInfo;

/// Index of a symbol in the symbol table's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionParam {
    pub name: String,
    pub ty: TypeInfo,
}

/// Everything a name can resolve to.
///
/// Locals and params both own a slot in the frame of their function. Slots
/// are numbered from 0 per function, params first, then locals in the order
/// they are declared, whatever block they are declared in.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Global {
        name: String,
        ty: TypeInfo,
    },
    Local {
        name: String,
        ty: TypeInfo,
        owner: SymbolId,
        slot: usize,
    },
    Param {
        name: String,
        ty: TypeInfo,
        owner: SymbolId,
        param_index: usize,
        slot: usize,
    },
    Function {
        name: String,
        params: Vec<FunctionParam>,
        return_type: TypeInfo,
    },
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Global { name, .. }
            | Symbol::Local { name, .. }
            | Symbol::Param { name, .. }
            | Symbol::Function { name, .. } => name,
        }
    }

    /// The type of a value symbol, `None` for functions.
    pub fn value_type(&self) -> Option<TypeInfo> {
        match self {
            Symbol::Global { ty, .. } | Symbol::Local { ty, .. } | Symbol::Param { ty, .. } => {
                Some(*ty)
            }
            Symbol::Function { .. } => None,
        }
    }

    /// The function whose frame stores this variable.
    pub fn owner(&self) -> Option<SymbolId> {
        match self {
            Symbol::Local { owner, .. } | Symbol::Param { owner, .. } => Some(*owner),
            _ => None,
        }
    }

    pub fn slot(&self) -> Option<usize> {
        match self {
            Symbol::Local { slot, .. } | Symbol::Param { slot, .. } => Some(*slot),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Symbol::Function { .. })
    }
}
