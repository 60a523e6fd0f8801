use std::fmt::Display;

use thiserror::Error;

use crate::{ast::ast::NodeId, lexer::tokens::TokenKind, type_checker::type_info::TypeInfo, SourceSpan};

/// Which phase an error came from, and how it is meant to be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Lexer and parser errors, recorded in the compilation error list.
    Syntax,
    /// Type checking and entrypoint validation failures.
    Semantic,
    /// Failures while interpreting a well-typed program.
    Runtime,
    /// A bug in the compiler itself rather than in the program.
    Internal,
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    span: Option<SourceSpan>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: SourceSpan) -> Self {
        Error {
            internal_error: error_impl,
            span: Some(span),
        }
    }

    pub fn without_span(error_impl: ErrorImpl) -> Self {
        Error {
            internal_error: error_impl,
            span: None,
        }
    }

    /// Attaches `span` unless the error already carries a more precise one.
    pub fn or_span(mut self, span: Option<SourceSpan>) -> Self {
        if self.span.is_none() {
            self.span = span;
        }
        self
    }

    pub fn get_span(&self) -> Option<&SourceSpan> {
        self.span.as_ref()
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnexpectedCharacter { .. }
            | ErrorImpl::MalformedIdentifier { .. }
            | ErrorImpl::UnexpectedToken { .. } => ErrorKind::Syntax,
            ErrorImpl::NumberParseError { .. }
            | ErrorImpl::UnknownSymbol { .. }
            | ErrorImpl::UnknownType { .. }
            | ErrorImpl::NotAValue { .. }
            | ErrorImpl::NotAFunction { .. }
            | ErrorImpl::TypeMatchError { .. }
            | ErrorImpl::ExpectedBool { .. }
            | ErrorImpl::ExpectedNumber { .. }
            | ErrorImpl::UnexpectedArguments { .. }
            | ErrorImpl::MissingArguments { .. }
            | ErrorImpl::ArgumentTypeMatchError { .. }
            | ErrorImpl::FunctionAlreadyDeclared { .. }
            | ErrorImpl::ReturnOutsideFunction
            | ErrorImpl::VariableOutsideFunction { .. }
            | ErrorImpl::CapturedVariable { .. }
            | ErrorImpl::MissingEntrypoint { .. }
            | ErrorImpl::InvalidEntrypoint { .. }
            | ErrorImpl::InvalidIntrinsic { .. } => ErrorKind::Semantic,
            ErrorImpl::GlobalVariableUnsupported { .. }
            | ErrorImpl::DivisionByZero
            | ErrorImpl::CallDepthExceeded { .. }
            | ErrorImpl::OutputFailed { .. } => ErrorKind::Runtime,
            ErrorImpl::UnresolvedNode { .. }
            | ErrorImpl::UnresolvedFunction { .. }
            | ErrorImpl::UnknownFile { .. }
            | ErrorImpl::ReturnMismatch { .. }
            | ErrorImpl::ScopeUnderflow
            | ErrorImpl::GlobalScopeExists
            | ErrorImpl::FrameMismatch { .. }
            | ErrorImpl::NoActiveFrame
            | ErrorImpl::InvalidOperands { .. } => ErrorKind::Internal,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnexpectedCharacter { .. } => "UnexpectedCharacter",
            ErrorImpl::MalformedIdentifier { .. } => "MalformedIdentifier",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnknownSymbol { .. } => "UnknownSymbol",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::NotAValue { .. } => "NotAValue",
            ErrorImpl::NotAFunction { .. } => "NotAFunction",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::ExpectedBool { .. } => "ExpectedBool",
            ErrorImpl::ExpectedNumber { .. } => "ExpectedNumber",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
            ErrorImpl::VariableOutsideFunction { .. } => "VariableOutsideFunction",
            ErrorImpl::CapturedVariable { .. } => "CapturedVariable",
            ErrorImpl::MissingEntrypoint { .. } => "MissingEntrypoint",
            ErrorImpl::InvalidEntrypoint { .. } => "InvalidEntrypoint",
            ErrorImpl::InvalidIntrinsic { .. } => "InvalidIntrinsic",
            ErrorImpl::GlobalVariableUnsupported { .. } => "GlobalVariableUnsupported",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::CallDepthExceeded { .. } => "CallDepthExceeded",
            ErrorImpl::OutputFailed { .. } => "OutputFailed",
            ErrorImpl::UnresolvedNode { .. } => "UnresolvedNode",
            ErrorImpl::UnresolvedFunction { .. } => "UnresolvedFunction",
            ErrorImpl::UnknownFile { .. } => "UnknownFile",
            ErrorImpl::ReturnMismatch { .. } => "ReturnMismatch",
            ErrorImpl::ScopeUnderflow => "ScopeUnderflow",
            ErrorImpl::GlobalScopeExists => "GlobalScopeExists",
            ErrorImpl::FrameMismatch { .. } => "FrameMismatch",
            ErrorImpl::NoActiveFrame => "NoActiveFrame",
            ErrorImpl::InvalidOperands { .. } => "InvalidOperands",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::MalformedIdentifier { .. } => ErrorTip::Suggestion(String::from(
                "`?` is only allowed as the last character of an identifier",
            )),
            ErrorImpl::UnexpectedToken { expected, .. } if expected.contains(&TokenKind::Semicolon) => {
                ErrorTip::Suggestion(String::from("did you miss a semicolon?"))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnknownSymbol { name } => {
                ErrorTip::Suggestion(format!("`{}` is not declared in this scope", name))
            }
            ErrorImpl::UnknownType { name } => ErrorTip::Suggestion(format!(
                "Unknown type `{}`, expected one of i32, f32, bool, void",
                name
            )),
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::UnexpectedArguments { expected, received, .. }
            | ErrorImpl::MissingArguments { expected, received, .. } => ErrorTip::Suggestion(
                format!("Expected {} arguments, received {}", expected, received),
            ),
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already declared", function))
            }
            ErrorImpl::CapturedVariable { .. } => ErrorTip::Suggestion(String::from(
                "nested functions cannot use locals of the enclosing function, pass it as a parameter",
            )),
            ErrorImpl::MissingEntrypoint { name } => {
                ErrorTip::Suggestion(format!("declare `func {}() {{ ... }}`", name))
            }
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.span {
            Some(span) => write!(
                f,
                "[{}] '{}': {}",
                span.formatted_location(),
                span.text,
                self.internal_error
            ),
            None => write!(f, "{}", self.internal_error),
        }
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

fn expected_list(expected: &[TokenKind]) -> String {
    match expected {
        [single] => format!("`{}`", single),
        _ => format!(
            "one of [{}]",
            expected
                .iter()
                .map(|kind| format!("`{}`", kind))
                .collect::<Vec<String>>()
                .join(", ")
        ),
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Syntax
    #[error("unexpected character {character:?}")]
    UnexpectedCharacter { character: char },
    #[error("identifiers must end after '?': {identifier:?}")]
    MalformedIdentifier { identifier: String },
    #[error("got `{found}`, expected {}", expected_list(.expected))]
    UnexpectedToken { found: TokenKind, expected: Vec<TokenKind> },

    // Semantic
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unknown symbol: {name}")]
    UnknownSymbol { name: String },
    #[error("unknown type: {name}")]
    UnknownType { name: String },
    #[error("not a value: {name}")]
    NotAValue { name: String },
    #[error("not a function: {name}")]
    NotAFunction { name: String },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMatchError { expected: TypeInfo, received: TypeInfo },
    #[error("expected bool, received {received}")]
    ExpectedBool { received: TypeInfo },
    #[error("expected number, received {received}")]
    ExpectedNumber { received: TypeInfo },
    #[error("too many arguments to {function}: expected {expected}, received {received}")]
    UnexpectedArguments { function: String, expected: usize, received: usize },
    #[error("missing arguments to {function}: expected {expected}, received {received}")]
    MissingArguments { function: String, expected: usize, received: usize },
    #[error("argument types do not match: expected {expected}, received {received}")]
    ArgumentTypeMatchError { expected: TypeInfo, received: TypeInfo },
    #[error("function {function:?} already declared")]
    FunctionAlreadyDeclared { function: String },
    #[error("return statement outside of function")]
    ReturnOutsideFunction,
    #[error("variable {variable:?} declared outside of a function")]
    VariableOutsideFunction { variable: String },
    #[error("{variable:?} belongs to an enclosing function")]
    CapturedVariable { variable: String },
    #[error("no entrypoint function {name:?}")]
    MissingEntrypoint { name: String },
    #[error("entrypoint {name:?} {reason}")]
    InvalidEntrypoint { name: String, reason: String },
    #[error("intrinsic {name:?} must be declared as {signature}")]
    InvalidIntrinsic { name: String, signature: String },

    // Runtime
    #[error("global variables are not supported yet: {variable}")]
    GlobalVariableUnsupported { variable: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("call depth exceeded {limit} frames")]
    CallDepthExceeded { limit: usize },
    #[error("failed to write program output: {message}")]
    OutputFailed { message: String },

    // Internal
    #[error("internal error: {what} for node {node} was not resolved")]
    UnresolvedNode { what: &'static str, node: NodeId },
    #[error("internal error: function {function:?} has no definition")]
    UnresolvedFunction { function: String },
    #[error("internal error: unknown file uid {uid}")]
    UnknownFile { uid: u32 },
    #[error("internal error: return from function {found:?} but expected return from {expected:?}")]
    ReturnMismatch { expected: String, found: String },
    #[error("internal error: cannot pop the global scope")]
    ScopeUnderflow,
    #[error("internal error: a global scope already exists")]
    GlobalScopeExists,
    #[error("internal error: {variable:?} is not stored in the frame of {function:?}")]
    FrameMismatch { variable: String, function: String },
    #[error("internal error: no active stack frame")]
    NoActiveFrame,
    #[error("internal error: invalid operands for `{operator}`")]
    InvalidOperands { operator: String },
}
