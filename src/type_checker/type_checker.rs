use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Expr, ExprKind, NodeId, ParsedFile},
        expressions::{BinaryExpr, CallExpr, UnaryExpr, UnaryOp},
        statements::{Block, FunctionDecl, IfExpr},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{
    symbol_table::{FileScope, FunctionDefinition, SymbolTable},
    symbols::{FunctionParam, Symbol, SymbolId},
    type_info::TypeInfo,
};

/// Assigns a type to every expression of a file, bottom up, and builds the
/// symbol table while doing so.
///
/// Any violation aborts the whole check with the first error.
pub struct TypeChecker<'ast> {
    table: SymbolTable,
    definitions: HashMap<SymbolId, FunctionDefinition<'ast>>,
    file: Option<&'ast ParsedFile>,
}

impl<'ast> Default for TypeChecker<'ast> {
    fn default() -> Self {
        TypeChecker::new()
    }
}

impl<'ast> TypeChecker<'ast> {
    pub fn new() -> Self {
        TypeChecker {
            table: SymbolTable::new(),
            definitions: HashMap::new(),
            file: None,
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(file = %file.file.name))]
    pub fn check_file(mut self, file: &'ast ParsedFile) -> Result<FileScope<'ast>, Error> {
        self.file = Some(file);
        self.table.push_global_scope()?;
        self.resolve_expr_list(&file.items)?;

        debug!(functions = self.definitions.len(), "checked file");

        Ok(FileScope {
            file,
            values: self.table.global_values(),
            symbols: self.table,
            definitions: self.definitions,
        })
    }

    /// Registers every function of the list before checking any item, so
    /// functions can be used before their declaration.
    fn resolve_expr_list(&mut self, items: &'ast [Expr]) -> Result<(), Error> {
        for item in items {
            if let ExprKind::Function(function) = &item.kind {
                self.resolve_function_symbol(item.id, function)
                    .map_err(|error| self.attach_span(error, item.id))?;
            }
        }

        for item in items {
            self.resolve_expr(item)?;
        }

        Ok(())
    }

    pub fn resolve_expr(&mut self, expr: &'ast Expr) -> Result<TypeInfo, Error> {
        if let Some(ty) = self.table.try_lookup_expr(expr.id) {
            return Ok(ty);
        }

        let ty = self
            .check_expr(expr)
            .map_err(|error| self.attach_span(error, expr.id))?;

        trace!(node = %expr.id, %ty, "resolved expression");
        self.table.set_expr_type(expr.id, ty);
        Ok(ty)
    }

    fn resolve_block(&mut self, block: &'ast Block) -> Result<TypeInfo, Error> {
        if let Some(ty) = self.table.try_lookup_expr(block.id) {
            return Ok(ty);
        }

        let ty = self
            .check_block(block)
            .map_err(|error| self.attach_span(error, block.id))?;

        self.table.set_expr_type(block.id, ty);
        Ok(ty)
    }

    fn attach_span(&self, error: Error, id: NodeId) -> Error {
        let span = self.file.and_then(|file| file.span_of(id));
        error.or_span(span)
    }

    fn check_expr(&mut self, expr: &'ast Expr) -> Result<TypeInfo, Error> {
        match &expr.kind {
            ExprKind::Number(text) => match text.parse::<i32>() {
                Ok(_) => Ok(TypeInfo::I32),
                Err(_) => Err(Error::without_span(ErrorImpl::NumberParseError {
                    token: text.clone(),
                })),
            },
            ExprKind::Boolean(_) => Ok(TypeInfo::Bool),
            ExprKind::Identifier(identifier) => {
                let symbol = self.table.lookup_value(&identifier.name)?;
                self.table.bind_value(expr.id, symbol);
                self.value_type(symbol)
            }
            ExprKind::Binary(binary) => self.check_binary_expr(binary),
            ExprKind::Unary(unary) => self.check_unary_expr(unary),
            ExprKind::Call(call) => self.check_call(expr.id, call),
            ExprKind::Block(block) => self.check_block(block),
            ExprKind::If(if_expr) => self.check_if_expr(if_expr),
            ExprKind::While(while_expr) => {
                let condition = self.resolve_expr(&while_expr.condition)?;
                check_is_bool(condition)?;
                self.resolve_block(&while_expr.body)?;
                Ok(TypeInfo::Void)
            }
            ExprKind::Function(function) => {
                self.check_function_body(expr.id, function)?;
                Ok(TypeInfo::Void)
            }
            ExprKind::Let(let_decl) => {
                let ty = self.table.resolve_type(&let_decl.ty)?;
                let value = self.resolve_expr(&let_decl.value)?;
                check_same(ty, value)?;

                // Declared after the initializer is checked, so the variable
                // cannot refer to itself
                let symbol = self.table.add_variable_symbol(&let_decl.name.name, ty)?;
                self.table.bind_value(expr.id, symbol);
                self.table.bind_value(let_decl.name.id, symbol);
                Ok(TypeInfo::Void)
            }
            ExprKind::Assign(assign) => {
                let symbol = self.table.lookup_value(&assign.target.name)?;
                let target = self.value_type(symbol)?;
                let value = self.resolve_expr(&assign.value)?;
                check_same(target, value)?;

                self.table.bind_value(expr.id, symbol);
                self.table.bind_value(assign.target.id, symbol);
                Ok(TypeInfo::Void)
            }
            ExprKind::Return(return_expr) => {
                let ty = match &return_expr.value {
                    Some(value) => self.resolve_expr(value)?,
                    None => TypeInfo::Void,
                };

                let function = self
                    .table
                    .current_function()
                    .ok_or_else(|| Error::without_span(ErrorImpl::ReturnOutsideFunction))?;

                let Symbol::Function { return_type, .. } = self.table.get_symbol(function) else {
                    return Err(Error::without_span(ErrorImpl::NotAFunction {
                        name: self.table.get_symbol(function).name().to_string(),
                    }));
                };
                check_same(*return_type, ty)?;

                // The expression itself has no value
                Ok(TypeInfo::Void)
            }
        }
    }

    fn value_type(&self, symbol: SymbolId) -> Result<TypeInfo, Error> {
        let symbol = self.table.get_symbol(symbol);

        symbol.value_type().ok_or_else(|| {
            Error::without_span(ErrorImpl::NotAValue {
                name: symbol.name().to_string(),
            })
        })
    }

    fn check_binary_expr(&mut self, binary: &'ast BinaryExpr) -> Result<TypeInfo, Error> {
        let left = self.resolve_expr(&binary.left)?;
        let right = self.resolve_expr(&binary.right)?;

        if binary.operator.is_arithmetic() {
            check_is_number(left)?;
            check_same(left, right)?;
            Ok(left)
        } else if binary.operator.is_logical() {
            check_is_bool(left)?;
            check_is_bool(right)?;
            Ok(TypeInfo::Bool)
        } else {
            check_same(left, right)?;
            Ok(TypeInfo::Bool)
        }
    }

    fn check_unary_expr(&mut self, unary: &'ast UnaryExpr) -> Result<TypeInfo, Error> {
        let ty = self.resolve_expr(&unary.operand)?;

        match unary.operator {
            UnaryOp::Neg => check_is_number(ty)?,
            UnaryOp::Not => check_is_bool(ty)?,
        }

        Ok(ty)
    }

    fn check_call(&mut self, id: NodeId, call: &'ast CallExpr) -> Result<TypeInfo, Error> {
        let function = self.table.lookup_function(&call.callee.name)?;
        self.table.bind_call_site(id, function);

        let Symbol::Function {
            params, return_type, ..
        } = self.table.get_symbol(function).clone()
        else {
            return Err(Error::without_span(ErrorImpl::NotAFunction {
                name: call.callee.name.clone(),
            }));
        };

        if call.arguments.len() > params.len() {
            return Err(Error::without_span(ErrorImpl::UnexpectedArguments {
                function: call.callee.name.clone(),
                expected: params.len(),
                received: call.arguments.len(),
            }));
        }

        if call.arguments.len() < params.len() {
            return Err(Error::without_span(ErrorImpl::MissingArguments {
                function: call.callee.name.clone(),
                expected: params.len(),
                received: call.arguments.len(),
            }));
        }

        for (argument, param) in call.arguments.iter().zip(params.iter()) {
            let ty = self.resolve_expr(argument)?;

            if ty != param.ty {
                return Err(Error::without_span(ErrorImpl::ArgumentTypeMatchError {
                    expected: param.ty,
                    received: ty,
                })
                .or_span(self.file.and_then(|file| file.span_of(argument.id))));
            }
        }

        Ok(return_type)
    }

    /// An empty block is `void` and opens no scope.
    fn check_block(&mut self, block: &'ast Block) -> Result<TypeInfo, Error> {
        let Some(last) = block.items.last() else {
            return Ok(TypeInfo::Void);
        };

        self.table.push_block_scope();
        self.resolve_expr_list(&block.items)?;
        let ty = self.resolve_expr(last)?;
        self.table.pop_scope()?;

        Ok(ty)
    }

    fn check_if_expr(&mut self, if_expr: &'ast IfExpr) -> Result<TypeInfo, Error> {
        let condition = self.resolve_expr(&if_expr.condition)?;
        check_is_bool(condition)?;
        let then_type = self.resolve_block(&if_expr.then_branch)?;

        for else_if in &if_expr.else_ifs {
            let condition = self.resolve_expr(&else_if.condition)?;
            check_is_bool(condition)?;
            let else_if_type = self.resolve_block(&else_if.then_branch)?;
            if if_expr.else_branch.is_some() {
                check_same(then_type, else_if_type)?;
            }
        }

        match &if_expr.else_branch {
            Some(else_branch) => {
                let else_type = self.resolve_block(else_branch)?;
                check_same(then_type, else_type)?;
                Ok(then_type)
            }
            None => Ok(TypeInfo::Void),
        }
    }

    fn resolve_function_symbol(&mut self, id: NodeId, function: &'ast FunctionDecl) -> Result<SymbolId, Error> {
        let mut params = vec![];
        for param in &function.params {
            params.push(FunctionParam {
                name: param.name.name.clone(),
                ty: self.table.resolve_type(&param.ty)?,
            });
        }

        let return_type = match &function.return_type {
            Some(return_type) => self.table.resolve_type(return_type)?,
            None => TypeInfo::Void,
        };

        self.table
            .add_function_symbol(id, &function.name.name, params, return_type)
    }

    /// Checks a function body in a new scope holding its parameters.
    fn check_function_body(&mut self, id: NodeId, function: &'ast FunctionDecl) -> Result<(), Error> {
        let symbol = match self.table.try_lookup_function_node(id) {
            Some(symbol) => symbol,
            None => self.resolve_function_symbol(id, function)?,
        };

        debug!(function = %function.name.name, "checking function body");
        self.table.push_function_scope(symbol);

        for (index, param) in function.params.iter().enumerate() {
            let ty = self.table.resolve_type(&param.ty)?;
            let param_symbol = self.table.add_param_symbol(&param.name.name, ty, index)?;
            self.table.bind_value(param.name.id, param_symbol);
        }

        self.resolve_expr_list(&function.body.items)?;
        let body_type = match function.body.items.last() {
            Some(last) => self.resolve_expr(last)?,
            None => TypeInfo::Void,
        };
        self.table.set_expr_type(function.body.id, body_type);

        self.table.pop_scope()?;

        let definition = self.table.finalize_function(symbol, function)?;
        self.definitions.insert(symbol, definition);
        Ok(())
    }
}

fn check_same(expected: TypeInfo, received: TypeInfo) -> Result<(), Error> {
    if expected != received {
        return Err(Error::without_span(ErrorImpl::TypeMatchError { expected, received }));
    }

    Ok(())
}

fn check_is_bool(ty: TypeInfo) -> Result<(), Error> {
    if ty != TypeInfo::Bool {
        return Err(Error::without_span(ErrorImpl::ExpectedBool { received: ty }));
    }

    Ok(())
}

/// `f32` is declarable but has no runtime values, so only `i32` counts.
fn check_is_number(ty: TypeInfo) -> Result<(), Error> {
    if ty != TypeInfo::I32 {
        return Err(Error::without_span(ErrorImpl::ExpectedNumber { received: ty }));
    }

    Ok(())
}
