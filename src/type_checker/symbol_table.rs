use std::collections::HashMap;

use tracing::trace;

use crate::{
    ast::{
        ast::{NodeId, ParsedFile},
        statements::FunctionDecl,
        types::TypeExpr,
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{
    symbols::{FunctionParam, Symbol, SymbolId},
    type_info::TypeInfo,
};

/// One namespace frame of the lexical scope stack.
#[derive(Debug, Default)]
pub struct Scope {
    types: HashMap<String, TypeInfo>,
    values: HashMap<String, SymbolId>,
    /// The function this scope belongs to, `None` only for the global scope
    /// and blocks outside of any function.
    function: Option<SymbolId>,
}

impl Scope {
    fn create_global() -> Self {
        let mut scope = Scope::default();
        for (name, ty) in TypeInfo::BUILTINS {
            scope.types.insert(name.to_string(), ty);
        }
        scope
    }
}

/// Locals and params of one function, in slot order within each list.
#[derive(Debug, Clone)]
pub struct FunctionScope {
    pub symbol: SymbolId,
    pub params: Vec<SymbolId>,
    pub locals: Vec<SymbolId>,
    finalized: bool,
}

impl FunctionScope {
    fn new(symbol: SymbolId) -> Self {
        FunctionScope {
            symbol,
            params: vec![],
            locals: vec![],
            finalized: false,
        }
    }

    /// Number of slots a frame of this function needs.
    pub fn num_slots(&self) -> usize {
        self.params.len() + self.locals.len()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

/// An immutable view of a fully checked function, what the interpreter
/// needs to call it.
#[derive(Debug, Clone)]
pub struct FunctionDefinition<'ast> {
    pub symbol: SymbolId,
    pub decl: &'ast FunctionDecl,
    pub num_locals: usize,
    pub params: Vec<SymbolId>,
}

/// Symbols, the scope stack and the resolution caches.
///
/// Every cache is keyed by the [`NodeId`] of the node it describes, so
/// visiting a node twice resolves it once.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scopes: Vec<Scope>,
    resolved_expr_types: HashMap<NodeId, TypeInfo>,
    resolved_call_sites: HashMap<NodeId, SymbolId>,
    resolved_type_refs: HashMap<NodeId, TypeInfo>,
    resolved_functions: HashMap<NodeId, SymbolId>,
    resolved_values: HashMap<NodeId, SymbolId>,
    function_scopes: HashMap<SymbolId, FunctionScope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn push_global_scope(&mut self) -> Result<(), Error> {
        if !self.scopes.is_empty() {
            return Err(Error::without_span(ErrorImpl::GlobalScopeExists));
        }

        self.scopes.push(Scope::create_global());
        Ok(())
    }

    pub fn push_function_scope(&mut self, function: SymbolId) {
        self.scopes.push(Scope {
            function: Some(function),
            ..Scope::default()
        });
    }

    /// Pushes a block scope that belongs to the enclosing function, if any.
    pub fn push_block_scope(&mut self) {
        let function = self.current_function();
        self.scopes.push(Scope {
            function,
            ..Scope::default()
        });
    }

    /// Pops the innermost scope. The global scope is never popped.
    pub fn pop_scope(&mut self) -> Result<(), Error> {
        if self.scopes.len() <= 1 {
            return Err(Error::without_span(ErrorImpl::ScopeUnderflow));
        }

        self.scopes.pop();
        Ok(())
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    fn current_scope(&mut self) -> Result<&mut Scope, Error> {
        self.scopes
            .last_mut()
            .ok_or_else(|| Error::without_span(ErrorImpl::ScopeUnderflow))
    }

    /// The function owning the innermost scope.
    pub fn current_function(&self) -> Option<SymbolId> {
        self.scopes.last().and_then(|scope| scope.function)
    }

    pub fn get_symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    fn add_symbol(&mut self, symbol: Symbol) -> Result<SymbolId, Error> {
        let id = SymbolId(self.symbols.len() as u32);
        let name = symbol.name().to_string();

        trace!(%id, name = %name, "declare symbol");
        self.symbols.push(symbol);
        self.current_scope()?.values.insert(name, id);

        Ok(id)
    }

    fn lookup_type(&self, name: &str) -> Result<TypeInfo, Error> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.types.get(name).copied())
            .ok_or_else(|| {
                Error::without_span(ErrorImpl::UnknownType {
                    name: name.to_string(),
                })
            })
    }

    pub fn resolve_type(&mut self, type_expr: &TypeExpr) -> Result<TypeInfo, Error> {
        if let Some(resolved) = self.resolved_type_refs.get(&type_expr.id) {
            return Ok(*resolved);
        }

        let resolved = self.lookup_type(&type_expr.name)?;
        self.resolved_type_refs.insert(type_expr.id, resolved);
        Ok(resolved)
    }

    pub fn lookup_type_ref(&self, id: NodeId) -> Result<TypeInfo, Error> {
        self.resolved_type_refs
            .get(&id)
            .copied()
            .ok_or_else(|| unresolved("type reference", id))
    }

    /// Searches the scope stack from the innermost scope outwards.
    pub fn lookup_symbol(&self, name: &str) -> Result<SymbolId, Error> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.values.get(name).copied())
            .ok_or_else(|| {
                Error::without_span(ErrorImpl::UnknownSymbol {
                    name: name.to_string(),
                })
            })
    }

    /// Looks up a variable, rejecting functions and variables that live in
    /// the frame of another function.
    pub fn lookup_value(&self, name: &str) -> Result<SymbolId, Error> {
        let id = self.lookup_symbol(name)?;
        let symbol = self.get_symbol(id);

        if symbol.is_function() {
            return Err(Error::without_span(ErrorImpl::NotAValue {
                name: name.to_string(),
            }));
        }

        if let Some(owner) = symbol.owner() {
            if self.current_function() != Some(owner) {
                return Err(Error::without_span(ErrorImpl::CapturedVariable {
                    variable: name.to_string(),
                }));
            }
        }

        Ok(id)
    }

    pub fn lookup_function(&self, name: &str) -> Result<SymbolId, Error> {
        let id = self.lookup_symbol(name)?;

        if !self.get_symbol(id).is_function() {
            return Err(Error::without_span(ErrorImpl::NotAFunction {
                name: name.to_string(),
            }));
        }

        Ok(id)
    }

    pub fn try_lookup_expr(&self, id: NodeId) -> Option<TypeInfo> {
        self.resolved_expr_types.get(&id).copied()
    }

    pub fn set_expr_type(&mut self, id: NodeId, ty: TypeInfo) {
        self.resolved_expr_types.insert(id, ty);
    }

    pub fn lookup_expr_type(&self, id: NodeId) -> Result<TypeInfo, Error> {
        self.try_lookup_expr(id)
            .ok_or_else(|| unresolved("expression type", id))
    }

    /// Only statically known functions can be called.
    pub fn bind_call_site(&mut self, call: NodeId, function: SymbolId) {
        self.resolved_call_sites.insert(call, function);
    }

    pub fn lookup_call_site(&self, call: NodeId) -> Result<SymbolId, Error> {
        self.resolved_call_sites
            .get(&call)
            .copied()
            .ok_or_else(|| unresolved("call site", call))
    }

    /// Records the variable an identifier, assignment or `let` refers to.
    pub fn bind_value(&mut self, node: NodeId, symbol: SymbolId) {
        self.resolved_values.insert(node, symbol);
    }

    pub fn lookup_bound_value(&self, node: NodeId) -> Result<SymbolId, Error> {
        self.resolved_values
            .get(&node)
            .copied()
            .ok_or_else(|| unresolved("variable reference", node))
    }

    /// Declares a variable in the innermost scope.
    ///
    /// In the global scope this is a [`Symbol::Global`], inside a function it
    /// is a [`Symbol::Local`] taking the next free slot of that function.
    pub fn add_variable_symbol(&mut self, name: &str, ty: TypeInfo) -> Result<SymbolId, Error> {
        if self.scopes.len() == 1 {
            return self.add_symbol(Symbol::Global {
                name: name.to_string(),
                ty,
            });
        }

        let Some(owner) = self.current_function() else {
            return Err(Error::without_span(ErrorImpl::VariableOutsideFunction {
                variable: name.to_string(),
            }));
        };

        let slot = self.function_scope_mut(owner, name)?.num_slots();
        let id = self.add_symbol(Symbol::Local {
            name: name.to_string(),
            ty,
            owner,
            slot,
        })?;

        self.function_scope_mut(owner, name)?.locals.push(id);
        Ok(id)
    }

    /// Declares the parameter at `param_index` of the current function.
    pub fn add_param_symbol(&mut self, name: &str, ty: TypeInfo, param_index: usize) -> Result<SymbolId, Error> {
        let Some(owner) = self.current_function() else {
            return Err(Error::without_span(ErrorImpl::VariableOutsideFunction {
                variable: name.to_string(),
            }));
        };

        let slot = self.function_scope_mut(owner, name)?.num_slots();
        let id = self.add_symbol(Symbol::Param {
            name: name.to_string(),
            ty,
            owner,
            param_index,
            slot,
        })?;

        self.function_scope_mut(owner, name)?.params.push(id);
        Ok(id)
    }

    /// Declares a function in the innermost scope and opens its function scope.
    pub fn add_function_symbol(
        &mut self,
        function_node: NodeId,
        name: &str,
        params: Vec<FunctionParam>,
        return_type: TypeInfo,
    ) -> Result<SymbolId, Error> {
        let already_declared = self
            .scopes
            .last()
            .and_then(|scope| scope.values.get(name))
            .is_some_and(|existing| self.get_symbol(*existing).is_function());

        if already_declared {
            return Err(Error::without_span(ErrorImpl::FunctionAlreadyDeclared {
                function: name.to_string(),
            }));
        }

        let id = self.add_symbol(Symbol::Function {
            name: name.to_string(),
            params,
            return_type,
        })?;

        self.resolved_functions.insert(function_node, id);
        self.function_scopes.insert(id, FunctionScope::new(id));
        Ok(id)
    }

    pub fn try_lookup_function_node(&self, function_node: NodeId) -> Option<SymbolId> {
        self.resolved_functions.get(&function_node).copied()
    }

    pub fn lookup_function_node(&self, function_node: NodeId) -> Result<SymbolId, Error> {
        self.try_lookup_function_node(function_node)
            .ok_or_else(|| unresolved("function", function_node))
    }

    pub fn lookup_function_scope(&self, function: SymbolId) -> Option<&FunctionScope> {
        self.function_scopes.get(&function)
    }

    fn function_scope_mut(&mut self, function: SymbolId, variable: &str) -> Result<&mut FunctionScope, Error> {
        let function_name = self.get_symbol(function).name().to_string();

        match self.function_scopes.get_mut(&function) {
            Some(scope) if !scope.finalized => Ok(scope),
            _ => Err(Error::without_span(ErrorImpl::FrameMismatch {
                variable: variable.to_string(),
                function: function_name,
            })),
        }
    }

    /// Freezes the slot count of a function once its body has been checked.
    pub fn finalize_function<'ast>(
        &mut self,
        function: SymbolId,
        decl: &'ast FunctionDecl,
    ) -> Result<FunctionDefinition<'ast>, Error> {
        let scope = self
            .function_scopes
            .get_mut(&function)
            .ok_or_else(|| unresolved("function scope", decl.name.id))?;

        scope.finalized = true;

        Ok(FunctionDefinition {
            symbol: function,
            decl,
            num_locals: scope.num_slots(),
            params: scope.params.clone(),
        })
    }

    /// The names declared in the global scope.
    pub fn global_values(&self) -> HashMap<String, SymbolId> {
        self.scopes
            .first()
            .map(|scope| scope.values.clone())
            .unwrap_or_default()
    }
}

fn unresolved(what: &'static str, node: NodeId) -> Error {
    Error::without_span(ErrorImpl::UnresolvedNode { what, node })
}

/// Everything known about a checked file.
#[derive(Debug)]
pub struct FileScope<'ast> {
    pub file: &'ast ParsedFile,
    pub symbols: SymbolTable,
    /// Names declared at the top level of the file
    pub values: HashMap<String, SymbolId>,
    pub definitions: HashMap<SymbolId, FunctionDefinition<'ast>>,
}

impl<'ast> FileScope<'ast> {
    pub fn lookup_definition(&self, function: SymbolId) -> Result<&FunctionDefinition<'ast>, Error> {
        self.definitions.get(&function).ok_or_else(|| {
            Error::without_span(ErrorImpl::UnresolvedFunction {
                function: self.symbols.get_symbol(function).name().to_string(),
            })
        })
    }
}
