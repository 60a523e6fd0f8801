use crate::{ast::types::TypeExpr, errors::errors::Error, lexer::tokens::TokenKind};

use super::parser::Parser;

/// Type annotations are plain names, resolved later by the type checker.
pub fn parse_type(parser: &mut Parser<'_>) -> Result<TypeExpr, Error> {
    let token = parser.expect(TokenKind::Identifier)?;

    Ok(TypeExpr {
        name: parser.source_of(&token),
        id: parser.stamp(token, token),
    })
}
