use std::{
    cmp::Ordering,
    io::{self, Stdout, Write},
};

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Expr, ExprKind},
        expressions::{BinaryOp, CallExpr, UnaryOp},
        statements::{Block, IfExpr},
    },
    errors::errors::{Error, ErrorImpl},
    type_checker::{
        symbol_table::{FileScope, FunctionDefinition},
        symbols::{Symbol, SymbolId},
        type_info::TypeInfo,
    },
};

use super::{config::InterpreterConfig, value::Value};

/// Free stack below which `eval` switches to a freshly allocated segment.
const RED_ZONE: usize = 100 * 1024;
/// Size of each stack segment allocated for deep recursion.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Evaluates to the value of a completed [`Flow`], or returns the flow from
/// the enclosing function when it is unwinding a `return`.
macro_rules! eval_value {
    ($flow:expr) => {
        match $flow? {
            Flow::Completed(value) => value,
            flow @ Flow::Returning(..) => return Ok(flow),
        }
    };
}

/// The outcome of evaluating an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Completed(Value),
    /// A `return` carrying its value back to the call of the given function.
    Returning(Value, SymbolId),
}

/// Storage of one active call, indexed by slot.
#[derive(Debug)]
pub struct StackFrame<'a> {
    pub definition: &'a FunctionDefinition<'a>,
    locals: Vec<Value>,
}

impl<'a> StackFrame<'a> {
    pub fn new(definition: &'a FunctionDefinition<'a>) -> Self {
        StackFrame {
            definition,
            locals: vec![Value::Void; definition.num_locals],
        }
    }

    fn slot_of(&self, symbol: &Symbol) -> Result<usize, Error> {
        match (symbol.owner(), symbol.slot()) {
            (Some(owner), Some(slot)) if owner == self.definition.symbol && slot < self.locals.len() => Ok(slot),
            _ => Err(Error::without_span(ErrorImpl::FrameMismatch {
                variable: symbol.name().to_string(),
                function: self.definition.decl.name.name.clone(),
            })),
        }
    }

    pub fn load(&self, symbol: &Symbol) -> Result<Value, Error> {
        Ok(self.locals[self.slot_of(symbol)?])
    }

    pub fn store(&mut self, symbol: &Symbol, value: Value) -> Result<(), Error> {
        let slot = self.slot_of(symbol)?;
        self.locals[slot] = value;
        Ok(())
    }
}

/// Runs a checked file. Program output from `println` and `printlnBool`
/// goes to `out`.
pub struct Interpreter<'a, W: Write> {
    file_scope: &'a FileScope<'a>,
    config: InterpreterConfig,
    /// The innermost frame is the current one.
    call_stack: Vec<StackFrame<'a>>,
    out: W,
}

impl<'a> Interpreter<'a, Stdout> {
    pub fn new(file_scope: &'a FileScope<'a>) -> Self {
        Interpreter::with_output(file_scope, io::stdout())
    }
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn with_output(file_scope: &'a FileScope<'a>, out: W) -> Self {
        Interpreter {
            file_scope,
            config: InterpreterConfig::default(),
            call_stack: vec![],
            out,
        }
    }

    pub fn with_config(mut self, config: InterpreterConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of calls currently active.
    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    #[tracing::instrument(level = "debug", skip_all, fields(entrypoint = %self.config.entrypoint))]
    pub fn run_from_entrypoint(&mut self) -> Result<Value, Error> {
        let entrypoint = self.lookup_entrypoint()?;
        self.call_function(entrypoint, vec![])
    }

    /// Calls a top level function by name with already evaluated arguments.
    pub fn invoke(&mut self, name: &str, arguments: Vec<Value>) -> Result<Value, Error> {
        let function = self.file_scope.values.get(name).copied().ok_or_else(|| {
            Error::without_span(ErrorImpl::UnknownSymbol {
                name: name.to_string(),
            })
        })?;

        let Symbol::Function { params, .. } = self.file_scope.symbols.get_symbol(function) else {
            return Err(Error::without_span(ErrorImpl::NotAFunction {
                name: name.to_string(),
            }));
        };

        if arguments.len() > params.len() {
            return Err(Error::without_span(ErrorImpl::UnexpectedArguments {
                function: name.to_string(),
                expected: params.len(),
                received: arguments.len(),
            }));
        }

        if arguments.len() < params.len() {
            return Err(Error::without_span(ErrorImpl::MissingArguments {
                function: name.to_string(),
                expected: params.len(),
                received: arguments.len(),
            }));
        }

        self.dispatch_call(function, arguments)
    }

    fn lookup_entrypoint(&self) -> Result<SymbolId, Error> {
        let name = &self.config.entrypoint;
        let missing = || {
            Error::without_span(ErrorImpl::MissingEntrypoint {
                name: name.to_string(),
            })
        };

        let symbol = self.file_scope.values.get(name).copied().ok_or_else(missing)?;
        let Symbol::Function {
            params, return_type, ..
        } = self.file_scope.symbols.get_symbol(symbol)
        else {
            return Err(missing());
        };

        let invalid = |reason: &str| {
            Error::without_span(ErrorImpl::InvalidEntrypoint {
                name: name.to_string(),
                reason: reason.to_string(),
            })
        };

        if !params.is_empty() {
            return Err(invalid("must have no parameters"));
        }

        if *return_type != TypeInfo::Void {
            return Err(invalid("must return void"));
        }

        Ok(symbol)
    }

    fn function_name(&self, function: SymbolId) -> String {
        self.file_scope.symbols.get_symbol(function).name().to_string()
    }

    /// Pushes a frame for `function`, binds the arguments to its parameter
    /// slots and evaluates the body. The frame is popped however the body
    /// exits.
    #[tracing::instrument(level = "debug", skip(self, arguments))]
    fn call_function(&mut self, function: SymbolId, arguments: Vec<Value>) -> Result<Value, Error> {
        if self.call_stack.len() >= self.config.max_call_depth {
            return Err(Error::without_span(ErrorImpl::CallDepthExceeded {
                limit: self.config.max_call_depth,
            }));
        }

        let file_scope = self.file_scope;
        let definition = file_scope.lookup_definition(function)?;

        let mut frame = StackFrame::new(definition);
        for (param, value) in definition.params.iter().zip(arguments) {
            frame.store(file_scope.symbols.get_symbol(*param), value)?;
        }

        debug!(function = %definition.decl.name.name, depth = self.call_stack.len(), "call");
        self.call_stack.push(frame);
        let result = self.eval_block(&definition.decl.body);
        self.call_stack.pop();

        match result? {
            Flow::Completed(value) => Ok(value),
            Flow::Returning(value, target) if target == function => Ok(value),
            Flow::Returning(_, target) => Err(Error::without_span(ErrorImpl::ReturnMismatch {
                expected: self.function_name(function),
                found: self.function_name(target),
            })),
        }
    }

    fn current_frame(&self) -> Result<&StackFrame<'a>, Error> {
        self.call_stack
            .last()
            .ok_or_else(|| Error::without_span(ErrorImpl::NoActiveFrame))
    }

    fn current_frame_mut(&mut self) -> Result<&mut StackFrame<'a>, Error> {
        self.call_stack
            .last_mut()
            .ok_or_else(|| Error::without_span(ErrorImpl::NoActiveFrame))
    }

    fn bound_variable(&self, expr: &Expr) -> Result<&'a Symbol, Error> {
        let file_scope = self.file_scope;
        let symbol = file_scope.symbols.get_symbol(file_scope.symbols.lookup_bound_value(expr.id)?);

        if let Symbol::Global { name, .. } = symbol {
            return Err(Error::without_span(ErrorImpl::GlobalVariableUnsupported {
                variable: name.clone(),
            }));
        }

        Ok(symbol)
    }

    pub fn eval(&mut self, expr: &'a Expr) -> Result<Flow, Error> {
        let file = self.file_scope.file;
        stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || self.eval_kind(expr))
            .map_err(|error| error.or_span(file.span_of(expr.id)))
    }

    fn eval_kind(&mut self, expr: &'a Expr) -> Result<Flow, Error> {
        let value = match &expr.kind {
            ExprKind::Number(text) => Value::I32(text.parse::<i32>().map_err(|_| {
                Error::without_span(ErrorImpl::NumberParseError { token: text.clone() })
            })?),
            ExprKind::Boolean(value) => Value::Bool(*value),
            ExprKind::Identifier(_) => {
                let symbol = self.bound_variable(expr)?;
                self.current_frame()?.load(symbol)?
            }
            ExprKind::Binary(binary) => {
                let left = eval_value!(self.eval(&binary.left));
                let right = eval_value!(self.eval(&binary.right));
                apply_binary(binary.operator, left, right)?
            }
            ExprKind::Unary(unary) => {
                let operand = eval_value!(self.eval(&unary.operand));
                let operator = unary.operator.to_string();

                match unary.operator {
                    UnaryOp::Neg => Value::I32(operand.as_i32(&operator)?.wrapping_neg()),
                    UnaryOp::Not => Value::Bool(!operand.as_bool(&operator)?),
                }
            }
            ExprKind::Call(call) => return self.eval_call(expr, call),
            ExprKind::Block(block) => return self.eval_block(block),
            ExprKind::If(if_expr) => return self.eval_if(if_expr),
            ExprKind::While(while_expr) => {
                while eval_value!(self.eval(&while_expr.condition)).as_bool("while")? {
                    eval_value!(self.eval_block(&while_expr.body));
                }
                Value::Void
            }
            // Nested functions are plain declarations, there are no closures
            ExprKind::Function(_) => Value::Void,
            ExprKind::Let(let_decl) => {
                let value = eval_value!(self.eval(&let_decl.value));
                let symbol = self.bound_variable(expr)?;
                trace!(variable = %symbol.name(), %value, "let");
                self.current_frame_mut()?.store(symbol, value)?;
                Value::Void
            }
            ExprKind::Assign(assign) => {
                let value = eval_value!(self.eval(&assign.value));
                let symbol = self.bound_variable(expr)?;
                trace!(variable = %symbol.name(), %value, "assign");
                self.current_frame_mut()?.store(symbol, value)?;
                Value::Void
            }
            ExprKind::Return(return_expr) => {
                let value = match &return_expr.value {
                    Some(value) => eval_value!(self.eval(value)),
                    None => Value::Void,
                };
                let function = self.current_frame()?.definition.symbol;
                return Ok(Flow::Returning(value, function));
            }
        };

        Ok(Flow::Completed(value))
    }

    /// A block evaluates to its last item, or `void` when empty.
    fn eval_block(&mut self, block: &'a Block) -> Result<Flow, Error> {
        let mut last = Value::Void;
        for item in &block.items {
            last = eval_value!(self.eval(item));
        }

        Ok(Flow::Completed(last))
    }

    /// Takes the first arm whose condition holds. Without an `else` the
    /// arm's value is dropped.
    fn eval_if(&mut self, if_expr: &'a IfExpr) -> Result<Flow, Error> {
        let mut taken = None;

        if eval_value!(self.eval(&if_expr.condition)).as_bool("if")? {
            taken = Some(&if_expr.then_branch);
        } else {
            for else_if in &if_expr.else_ifs {
                if eval_value!(self.eval(&else_if.condition)).as_bool("if")? {
                    taken = Some(&else_if.then_branch);
                    break;
                }
            }
        }

        let taken = taken.or(if_expr.else_branch.as_ref());
        let Some(block) = taken else {
            return Ok(Flow::Completed(Value::Void));
        };

        let value = eval_value!(self.eval_block(block));
        match if_expr.else_branch {
            Some(_) => Ok(Flow::Completed(value)),
            None => Ok(Flow::Completed(Value::Void)),
        }
    }

    fn eval_call(&mut self, expr: &'a Expr, call: &'a CallExpr) -> Result<Flow, Error> {
        let function = self.file_scope.symbols.lookup_call_site(expr.id)?;

        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(eval_value!(self.eval(argument)));
        }

        Ok(Flow::Completed(self.dispatch_call(function, arguments)?))
    }

    /// Routes `println` and `printlnBool` to their intrinsics, every other
    /// function to a regular call.
    fn dispatch_call(&mut self, function: SymbolId, arguments: Vec<Value>) -> Result<Value, Error> {
        match self.function_name(function).as_str() {
            "println" => self.print_intrinsic(function, TypeInfo::I32, &arguments)?,
            "printlnBool" => self.print_intrinsic(function, TypeInfo::Bool, &arguments)?,
            _ => return self.call_function(function, arguments),
        }

        Ok(Value::Void)
    }

    /// `println` and `printlnBool` write their argument on its own line
    /// instead of running the declared body.
    fn print_intrinsic(&mut self, function: SymbolId, param_type: TypeInfo, arguments: &[Value]) -> Result<(), Error> {
        let symbol = self.file_scope.symbols.get_symbol(function);

        let valid = match symbol {
            Symbol::Function {
                params, return_type, ..
            } => params.len() == 1 && params[0].ty == param_type && *return_type == TypeInfo::Void,
            _ => false,
        };

        let [argument] = arguments else {
            return Err(invalid_intrinsic(symbol.name(), param_type));
        };

        if !valid {
            return Err(invalid_intrinsic(symbol.name(), param_type));
        }

        writeln!(self.out, "{}", argument).map_err(|error| {
            Error::without_span(ErrorImpl::OutputFailed {
                message: error.to_string(),
            })
        })
    }
}

fn invalid_intrinsic(name: &str, param_type: TypeInfo) -> Error {
    Error::without_span(ErrorImpl::InvalidIntrinsic {
        name: name.to_string(),
        signature: format!("func {}(value: {})", name, param_type),
    })
}

fn apply_binary(operator: BinaryOp, left: Value, right: Value) -> Result<Value, Error> {
    let symbol = operator.symbol();

    let value = match operator {
        BinaryOp::Add => Value::I32(left.as_i32(symbol)?.wrapping_add(right.as_i32(symbol)?)),
        BinaryOp::Sub => Value::I32(left.as_i32(symbol)?.wrapping_sub(right.as_i32(symbol)?)),
        BinaryOp::Mul => Value::I32(left.as_i32(symbol)?.wrapping_mul(right.as_i32(symbol)?)),
        BinaryOp::Div => {
            let divisor = right.as_i32(symbol)?;
            if divisor == 0 {
                return Err(Error::without_span(ErrorImpl::DivisionByZero));
            }
            Value::I32(left.as_i32(symbol)?.wrapping_div(divisor))
        }
        BinaryOp::And => Value::Bool(left.as_bool(symbol)? && right.as_bool(symbol)?),
        BinaryOp::Or => Value::Bool(left.as_bool(symbol)? || right.as_bool(symbol)?),
        BinaryOp::Equals => Value::Bool(left == right),
        BinaryOp::NotEquals => Value::Bool(left != right),
        BinaryOp::Less => Value::Bool(left.compare(&right, symbol)? == Ordering::Less),
        BinaryOp::LessEquals => Value::Bool(left.compare(&right, symbol)? != Ordering::Greater),
        BinaryOp::Greater => Value::Bool(left.compare(&right, symbol)? == Ordering::Greater),
        BinaryOp::GreaterEquals => Value::Bool(left.compare(&right, symbol)? != Ordering::Less),
    };

    Ok(value)
}
