use std::collections::HashMap;

use crate::{
    ast::{
        ast::Expr,
        expressions::{BinaryOp, UnaryOp},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

/// Left binding power of each precedence level. The right binding power is
/// one higher, which makes every infix operator left associative.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub enum BindingPower {
    Default = 0,
    LogicalOr = 10,
    LogicalAnd = 20,
    Relational = 30,
    Additive = 40,
    Multiplicative = 50,
    Unary = 60,
}

impl BindingPower {
    pub fn left(&self) -> u8 {
        *self as u8
    }

    pub fn right(&self) -> u8 {
        *self as u8 + 1
    }
}

pub type NUDHandler = fn(&mut Parser<'_>) -> Result<Expr, Error>;

pub fn create_token_lookups(parser: &mut Parser<'_>) {
    // Logical
    parser.led(TokenKind::Or, BindingPower::LogicalOr, BinaryOp::Or);
    parser.led(TokenKind::And, BindingPower::LogicalAnd, BinaryOp::And);

    // Relational
    parser.led(TokenKind::Equals, BindingPower::Relational, BinaryOp::Equals);
    parser.led(TokenKind::NotEquals, BindingPower::Relational, BinaryOp::NotEquals);
    parser.led(TokenKind::Less, BindingPower::Relational, BinaryOp::Less);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, BinaryOp::LessEquals);
    parser.led(TokenKind::Greater, BindingPower::Relational, BinaryOp::Greater);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, BinaryOp::GreaterEquals);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, BinaryOp::Add);
    parser.led(TokenKind::Dash, BindingPower::Additive, BinaryOp::Sub);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, BinaryOp::Mul);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, BinaryOp::Div);

    // Prefix
    parser.prefix(TokenKind::Dash, UnaryOp::Neg);
    parser.prefix(TokenKind::Not, UnaryOp::Not);

    // Atoms
    parser.nud(TokenKind::OpenCurly, parse_block_expr);
    parser.nud(TokenKind::Let, parse_let_expr);
    parser.nud(TokenKind::Func, parse_function_expr);
    parser.nud(TokenKind::While, parse_while_expr);
    parser.nud(TokenKind::If, parse_if_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::Number, parse_number_expr);
    parser.nud(TokenKind::Identifier, parse_identifier_expr);
    parser.nud(TokenKind::False, parse_boolean_expr);
    parser.nud(TokenKind::True, parse_boolean_expr);
    parser.nud(TokenKind::Return, parse_return_expr);
}

/// Tokens that may start an atom, in the order they are listed in errors.
pub const ATOM_STARTS: [TokenKind; 11] = [
    TokenKind::OpenCurly,
    TokenKind::Let,
    TokenKind::Func,
    TokenKind::While,
    TokenKind::If,
    TokenKind::OpenParen,
    TokenKind::Number,
    TokenKind::Identifier,
    TokenKind::False,
    TokenKind::True,
    TokenKind::Return,
];

// Lookup tables inside parser struct, so it's easier
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, (BinaryOp, BindingPower)>;
pub type PrefixLookup = HashMap<TokenKind, UnaryOp>;
