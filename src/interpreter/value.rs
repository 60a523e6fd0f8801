use std::{cmp::Ordering, fmt::Display};

use crate::errors::errors::{Error, ErrorImpl};

/// A runtime value. Uninitialized slots hold [`Value::Void`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Value {
    I32(i32),
    Bool(bool),
    #[default]
    Void,
}

impl Value {
    pub fn as_i32(&self, operator: &str) -> Result<i32, Error> {
        match self {
            Value::I32(value) => Ok(*value),
            _ => Err(invalid_operands(operator)),
        }
    }

    pub fn as_bool(&self, operator: &str) -> Result<bool, Error> {
        match self {
            Value::Bool(value) => Ok(*value),
            _ => Err(invalid_operands(operator)),
        }
    }

    /// Orders two values of the same type. `false` sorts before `true`.
    pub fn compare(&self, other: &Value, operator: &str) -> Result<Ordering, Error> {
        match (self, other) {
            (Value::I32(left), Value::I32(right)) => Ok(left.cmp(right)),
            (Value::Bool(left), Value::Bool(right)) => Ok(left.cmp(right)),
            _ => Err(invalid_operands(operator)),
        }
    }
}

fn invalid_operands(operator: &str) -> Error {
    Error::without_span(ErrorImpl::InvalidOperands {
        operator: operator.to_string(),
    })
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::I32(value) => write!(f, "{}", value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Void => write!(f, "void"),
        }
    }
}
