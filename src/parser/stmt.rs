use crate::{
    ast::{
        ast::{Expr, ExprKind},
        expressions::ReturnExpr,
        statements::{Block, ElseIf, FuncParam, FunctionDecl, IfExpr, LetDecl, WhileExpr},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{
    expr::{create_identifier, parse_grouping_expr},
    parser::Parser,
    types::parse_type,
};

/// Only `func` and `let` may appear at the top level of a file.
pub fn parse_top_level_item(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    match parser.peek()? {
        TokenKind::Func => parse_function_expr(parser),
        TokenKind::Let => {
            let item = parse_let_expr(parser)?;
            parser.expect(TokenKind::Semicolon)?;
            Ok(item)
        }
        _ => Err(parser.report_unexpected(&[TokenKind::Func, TokenKind::Let])),
    }
}

/// `{ item; item; ... }`.
///
/// Every item is terminated by `;`, which may be left out after an item that
/// itself ends with a closing brace.
pub fn parse_block(parser: &mut Parser<'_>) -> Result<Block, Error> {
    let open_curly = parser.expect(TokenKind::OpenCurly)?;
    let mut items = vec![];

    while parser.has_tokens()? && parser.peek()? != TokenKind::CloseCurly {
        let item = parser.parse_expr()?;

        if item.is_block_like() {
            parser.match_consume(TokenKind::Semicolon)?;
        } else {
            parser.expect(TokenKind::Semicolon)?;
        }

        items.push(item);
    }

    let close_curly = parser.expect(TokenKind::CloseCurly)?;

    Ok(Block {
        id: parser.stamp(open_curly, close_curly),
        items,
    })
}

pub fn parse_block_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let block = parse_block(parser)?;

    Ok(Expr {
        id: block.id,
        kind: ExprKind::Block(block),
    })
}

/// `let name: type = value`. The caller handles the terminating `;`.
pub fn parse_let_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let let_token = parser.expect(TokenKind::Let)?;
    let name_token = parser.expect(TokenKind::Identifier)?;
    let name = create_identifier(parser, name_token);

    parser.expect(TokenKind::Colon)?;
    let ty = parse_type(parser)?;
    parser.expect(TokenKind::Assignment)?;

    let value = parser.parse_expr()?;
    let end = parser.end_of(value.id)?;

    Ok(parser.new_expr(
        ExprKind::Let(LetDecl {
            name,
            ty,
            value: Box::new(value),
        }),
        let_token,
        end,
    ))
}

pub fn parse_function_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let func_token = parser.expect(TokenKind::Func)?;
    let name_token = parser.expect(TokenKind::Identifier)?;
    let name = create_identifier(parser, name_token);

    parser.expect(TokenKind::OpenParen)?;

    let mut params = vec![];
    while parser.peek()? != TokenKind::CloseParen {
        let param_token = parser.expect(TokenKind::Identifier)?;
        let param_name = create_identifier(parser, param_token);
        parser.expect(TokenKind::Colon)?;
        let ty = parse_type(parser)?;

        params.push(FuncParam {
            name: param_name,
            ty,
        });

        if parser.peek()? == TokenKind::CloseParen {
            break;
        }
        parser.expect(TokenKind::Comma)?;
    }

    parser.expect(TokenKind::CloseParen)?;

    let return_type = if parser.match_consume(TokenKind::Arrow)? {
        Some(parse_type(parser)?)
    } else {
        None
    };

    let body = parse_block(parser)?;
    let end = parser.end_of(body.id)?;

    Ok(parser.new_expr(
        ExprKind::Function(FunctionDecl {
            name,
            params,
            return_type,
            body,
        }),
        func_token,
        end,
    ))
}

pub fn parse_while_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let while_token = parser.expect(TokenKind::While)?;
    let condition = parse_grouping_expr(parser)?;
    let body = parse_block(parser)?;
    let end = parser.end_of(body.id)?;

    Ok(parser.new_expr(
        ExprKind::While(WhileExpr {
            condition: Box::new(condition),
            body,
        }),
        while_token,
        end,
    ))
}

/// `if (cond) { } else if (cond) { } else { }`, with any number of `else if` arms.
pub fn parse_if_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let if_token = parser.expect(TokenKind::If)?;
    let condition = parse_grouping_expr(parser)?;
    let then_branch = parse_block(parser)?;
    let mut end = parser.end_of(then_branch.id)?;

    let mut else_ifs = vec![];
    let mut else_branch = None;

    while parser.match_consume(TokenKind::Else)? {
        if parser.match_consume(TokenKind::If)? {
            let condition = parse_grouping_expr(parser)?;
            let then_branch = parse_block(parser)?;
            end = parser.end_of(then_branch.id)?;

            else_ifs.push(ElseIf {
                condition,
                then_branch,
            });
        } else if parser.peek()? == TokenKind::OpenCurly {
            let block = parse_block(parser)?;
            end = parser.end_of(block.id)?;
            else_branch = Some(block);
            break;
        } else {
            return Err(parser.report_unexpected(&[TokenKind::If, TokenKind::OpenCurly]));
        }
    }

    Ok(parser.new_expr(
        ExprKind::If(IfExpr {
            condition: Box::new(condition),
            then_branch,
            else_ifs,
            else_branch,
        }),
        if_token,
        end,
    ))
}

/// `return` with an optional value. A bare `return` must be followed by `;`.
pub fn parse_return_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let return_token = parser.expect(TokenKind::Return)?;

    let value = if parser.peek()? != TokenKind::Semicolon {
        Some(Box::new(parser.parse_expr()?))
    } else {
        None
    };

    let end = match &value {
        Some(value) => parser.end_of(value.id)?,
        None => return_token,
    };

    Ok(parser.new_expr(ExprKind::Return(ReturnExpr { value }), return_token, end))
}
