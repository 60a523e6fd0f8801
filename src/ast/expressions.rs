use std::fmt::Display;

use super::ast::{Expr, NodeId};

/// A name, either referenced or being declared.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub id: NodeId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,

    And,
    Or,

    Equals,
    NotEquals,

    LessEquals,
    Less,
    GreaterEquals,
    Greater,
}

impl BinaryOp {
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Equals
                | BinaryOp::NotEquals
                | BinaryOp::LessEquals
                | BinaryOp::Less
                | BinaryOp::GreaterEquals
                | BinaryOp::Greater
        )
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::LessEquals => "<=",
            BinaryOp::Less => "<",
            BinaryOp::GreaterEquals => ">=",
            BinaryOp::Greater => ">",
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::Neg => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: BinaryOp,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: UnaryOp,
    pub operand: Box<Expr>,
}

/// `callee(arguments...)`. Only named functions can be called.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Identifier,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub target: Identifier,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnExpr {
    pub value: Option<Box<Expr>>,
}
