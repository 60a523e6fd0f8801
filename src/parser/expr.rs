use crate::{
    ast::{
        ast::{Expr, ExprKind},
        expressions::{AssignExpr, BinaryExpr, CallExpr, Identifier, UnaryExpr},
    },
    errors::errors::Error,
    lexer::tokens::{Token, TokenKind},
};

use super::{
    lookups::{BindingPower, ATOM_STARTS},
    parser::Parser,
};

/// Precedence climbing: parses a prefixed or plain atom, then keeps folding
/// infix operators whose left binding power is at least `min_bp`.
pub fn parse_expr(parser: &mut Parser<'_>, min_bp: u8) -> Result<Expr, Error> {
    let next = parser.peek()?;
    let mut left = match parser.get_prefix(next) {
        Some(operator) => {
            let operator_token = parser.advance()?;
            let operand = parse_expr(parser, BindingPower::Unary.left())?;
            let end = parser.end_of(operand.id)?;

            parser.new_expr(
                ExprKind::Unary(UnaryExpr {
                    operator,
                    operand: Box::new(operand),
                }),
                operator_token,
                end,
            )
        }
        None => parse_atom(parser)?,
    };

    loop {
        let next = parser.peek()?;
        let Some((operator, binding_power)) = parser.get_led(next) else {
            break;
        };

        if binding_power.left() < min_bp {
            break;
        }

        parser.advance()?;
        let right = parse_expr(parser, binding_power.right())?;

        let start = parser.start_of(left.id)?;
        let end = parser.end_of(right.id)?;
        left = parser.new_expr(
            ExprKind::Binary(BinaryExpr {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            }),
            start,
            end,
        );
    }

    Ok(left)
}

fn parse_atom(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let next = parser.peek()?;
    match parser.get_nud(next) {
        Some(nud_fn) => nud_fn(parser),
        None => Err(parser.report_unexpected(&ATOM_STARTS)),
    }
}

pub fn parse_number_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let token = parser.expect(TokenKind::Number)?;
    let text = parser.source_of(&token);

    Ok(parser.new_expr(ExprKind::Number(text), token, token))
}

pub fn parse_boolean_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let token = parser.advance()?;

    match token.kind {
        TokenKind::True => Ok(parser.new_expr(ExprKind::Boolean(true), token, token)),
        TokenKind::False => Ok(parser.new_expr(ExprKind::Boolean(false), token, token)),
        _ => Err(parser.report_wrong_token_type(token, &[TokenKind::False, TokenKind::True])),
    }
}

/// Builds an identifier node from an already consumed identifier token.
pub fn create_identifier(parser: &mut Parser<'_>, token: Token) -> Identifier {
    Identifier {
        name: parser.source_of(&token),
        id: parser.stamp(token, token),
    }
}

/// A name on its own, or the start of a call or an assignment.
pub fn parse_identifier_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    let identifier = create_identifier(parser, token);

    match parser.peek()? {
        TokenKind::OpenParen => parse_call_expr(parser, identifier),
        TokenKind::Assignment => parse_assign_expr(parser, identifier),
        _ => Ok(Expr {
            id: identifier.id,
            kind: ExprKind::Identifier(identifier),
        }),
    }
}

pub fn parse_call_expr(parser: &mut Parser<'_>, callee: Identifier) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];
    while parser.peek()? != TokenKind::CloseParen {
        arguments.push(parser.parse_expr()?);

        if parser.peek()? == TokenKind::CloseParen {
            break;
        }
        parser.expect(TokenKind::Comma)?;
    }

    let close_paren = parser.expect(TokenKind::CloseParen)?;
    let start = parser.start_of(callee.id)?;

    Ok(parser.new_expr(
        ExprKind::Call(CallExpr { callee, arguments }),
        start,
        close_paren,
    ))
}

pub fn parse_assign_expr(parser: &mut Parser<'_>, target: Identifier) -> Result<Expr, Error> {
    parser.expect(TokenKind::Assignment)?;
    let value = parser.parse_expr()?;

    let start = parser.start_of(target.id)?;
    let end = parser.end_of(value.id)?;

    Ok(parser.new_expr(
        ExprKind::Assign(AssignExpr {
            target,
            value: Box::new(value),
        }),
        start,
        end,
    ))
}

/// `( expr )`. The parentheses do not produce a node of their own.
pub fn parse_grouping_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parser.parse_expr()?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}
