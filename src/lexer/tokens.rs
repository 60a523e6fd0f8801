use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::{context::context::CompilerCtx, errors::errors::Error};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("func", TokenKind::Func);
        map.insert("while", TokenKind::While);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("let", TokenKind::Let);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("return", TokenKind::Return);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,

    Identifier,
    Number,

    Plus,
    Dash,
    Star,
    Slash,

    And, // &&
    Or,  // ||

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    LessEquals,
    Less,
    GreaterEquals,
    Greater,

    Colon,
    Semicolon,
    Comma,
    Arrow,

    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,

    // Reserved
    Func,
    While,
    If,
    Else,
    Let,
    True,
    False,
    Return,
}

impl TokenKind {
    /// The way the token is written in source, used in diagnostics.
    pub fn repr(&self) -> &'static str {
        match self {
            TokenKind::EOF => "<EOF>",
            TokenKind::Identifier => "a-zA-Z",
            TokenKind::Number => "0-9",
            TokenKind::Plus => "+",
            TokenKind::Dash => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Assignment => "=",
            TokenKind::Equals => "==",
            TokenKind::Not => "!",
            TokenKind::NotEquals => "!=",
            TokenKind::LessEquals => "<=",
            TokenKind::Less => "<",
            TokenKind::GreaterEquals => ">=",
            TokenKind::Greater => ">",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Arrow => "->",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenCurly => "{",
            TokenKind::CloseCurly => "}",
            TokenKind::Func => "func",
            TokenKind::While => "while",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Let => "let",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Return => "return",
        }
    }

    /// Whether the token text carries information beyond its kind.
    pub fn should_display_source(&self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::Number)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.repr())
    }
}

/// A classified slice `start_offset..end_offset` of one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub file_uid: u32,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl Token {
    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    pub fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }

    pub fn is_one_of(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// Renders the token with its source location, e.g. `Token[foo Identifier L1:5-7]`.
    pub fn format(&self, ctx: &CompilerCtx) -> Result<String, Error> {
        let span = ctx.get_token_span(self)?;

        if self.kind.should_display_source() {
            Ok(format!(
                "Token[{} {:?} {}]",
                span.text,
                self.kind,
                span.formatted_location()
            ))
        } else {
            Ok(format!("Token[{:?} {}]", self.kind, span.formatted_location()))
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token[{:?}]", self.kind)
    }
}
