use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::{
    context::context::SourceFile,
    errors::errors::{Error, ErrorImpl},
    get_source_span, MK_LOOKAHEAD_TOKEN, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

lazy_static! {
    static ref SKIP_PATTERN: Regex = Regex::new(r"\A(?:\s+|//[^\n]*)+").unwrap();
    static ref IDENTIFIER_PATTERN: Regex =
        Regex::new(r"\A[\p{L}_$][\p{L}\p{N}_$-]*\??").unwrap();
    static ref IDENTIFIER_PART_PATTERN: Regex = Regex::new(r"\A[\p{L}\p{N}_$?-]").unwrap();
    static ref NUMBER_PATTERN: Regex = Regex::new(r"\A[0-9]+").unwrap();
}

/// Pull-based tokenizer over a single source file.
///
/// Tokens are produced on demand, one token of lookahead is cached by
/// [`Lexer::peek`] until it is consumed with [`Lexer::next`]. Once the input is
/// exhausted every further call yields the same EOF token.
pub struct Lexer {
    file: Rc<SourceFile>,
    position: usize,
    token_start: usize,
    peeked: Option<Token>,
}

impl Lexer {
    pub fn new(file: Rc<SourceFile>) -> Lexer {
        Lexer {
            file,
            position: 0,
            token_start: 0,
            peeked: None,
        }
    }

    pub fn file(&self) -> &Rc<SourceFile> {
        &self.file
    }

    pub fn peek(&mut self) -> Result<TokenKind, Error> {
        Ok(self.peek_token()?.kind)
    }

    pub fn peek_token(&mut self) -> Result<Token, Error> {
        if let Some(token) = self.peeked {
            return Ok(token);
        }

        let token = self.tokenize_next()?;
        trace!(kind = ?token.kind, start = token.start_offset, end = token.end_offset, "token");
        self.peeked = Some(token);
        Ok(token)
    }

    pub fn has_next(&mut self) -> Result<bool, Error> {
        Ok(self.peek()? != TokenKind::EOF)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Token, Error> {
        let token = self.peek_token()?;
        self.peeked = None;
        Ok(token)
    }

    pub fn match_consume(&mut self, kind: TokenKind) -> Result<bool, Error> {
        if self.peek()? == kind {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn get_source_of(&self, token: &Token) -> &str {
        self.file
            .contents
            .get(token.start_offset..token.end_offset)
            .unwrap_or_default()
    }

    /// Consumes every remaining token, not including the final EOF.
    pub fn tokenize_all(&mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = vec![];

        while self.has_next()? {
            tokens.push(self.next()?);
        }

        Ok(tokens)
    }

    fn tokenize_next(&mut self) -> Result<Token, Error> {
        self.skip_whitespace_and_comments();

        let file = Rc::clone(&self.file);
        let remainder = &file.contents[self.position..];

        if let Some(found) = IDENTIFIER_PATTERN.find(remainder) {
            return self.identifier(found.as_str());
        }

        if let Some(found) = NUMBER_PATTERN.find(remainder) {
            self.position += found.end();
            return Ok(self.make_token(TokenKind::Number));
        }

        let Some(current) = self.next_char() else {
            return Ok(MK_TOKEN!(TokenKind::EOF, file.uid, self.position, self.position));
        };

        let token = match current {
            '+' => self.make_token(TokenKind::Plus),
            '-' => MK_LOOKAHEAD_TOKEN!(self, '>', TokenKind::Arrow, TokenKind::Dash),
            '*' => self.make_token(TokenKind::Star),
            // `//` comments never reach this point
            '/' => self.make_token(TokenKind::Slash),
            ';' => self.make_token(TokenKind::Semicolon),
            ':' => self.make_token(TokenKind::Colon),
            ',' => self.make_token(TokenKind::Comma),
            '(' => self.make_token(TokenKind::OpenParen),
            ')' => self.make_token(TokenKind::CloseParen),
            '{' => self.make_token(TokenKind::OpenCurly),
            '}' => self.make_token(TokenKind::CloseCurly),
            '=' => MK_LOOKAHEAD_TOKEN!(self, '=', TokenKind::Equals, TokenKind::Assignment),
            '!' => MK_LOOKAHEAD_TOKEN!(self, '=', TokenKind::NotEquals, TokenKind::Not),
            '<' => MK_LOOKAHEAD_TOKEN!(self, '=', TokenKind::LessEquals, TokenKind::Less),
            '>' => MK_LOOKAHEAD_TOKEN!(self, '=', TokenKind::GreaterEquals, TokenKind::Greater),
            '&' if self.match_char('&') => self.make_token(TokenKind::And),
            '|' if self.match_char('|') => self.make_token(TokenKind::Or),
            character => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedCharacter { character },
                    self.current_span(),
                ))
            }
        };

        Ok(token)
    }

    fn identifier(&mut self, text: &str) -> Result<Token, Error> {
        self.position += text.len();

        // `?` may only terminate an identifier
        if text.ends_with('?') && IDENTIFIER_PART_PATTERN.is_match(&self.file.contents[self.position..]) {
            return Err(Error::new(
                ErrorImpl::MalformedIdentifier {
                    identifier: text.to_string(),
                },
                self.current_span(),
            ));
        }

        let kind = RESERVED_LOOKUP
            .get(text)
            .copied()
            .unwrap_or(TokenKind::Identifier);

        Ok(self.make_token(kind))
    }

    fn skip_whitespace_and_comments(&mut self) {
        if let Some(found) = SKIP_PATTERN.find(&self.file.contents[self.position..]) {
            self.position += found.end();
        }

        self.token_start = self.position;
    }

    fn next_char(&mut self) -> Option<char> {
        let character = self.file.contents[self.position..].chars().next()?;
        self.position += character.len_utf8();
        Some(character)
    }

    /// Consumes `expected` if it is the next character.
    pub(crate) fn match_char(&mut self, expected: char) -> bool {
        match self.file.contents[self.position..].chars().next() {
            Some(character) if character == expected => {
                self.position += character.len_utf8();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn make_token(&mut self, kind: TokenKind) -> Token {
        let token = MK_TOKEN!(kind, self.file.uid, self.token_start, self.position);
        self.token_start = self.position;
        token
    }

    fn current_span(&self) -> crate::SourceSpan {
        get_source_span(&self.file.contents, self.token_start, self.position)
    }
}
