//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and its token handling.
//! Expressions are parsed with a Pratt parser, atoms are dispatched through a
//! NUD (null denotation) lookup table and infix operators through a binding
//! power table. Items and control flow are parsed by recursive descent.
//!
//! Every node gets a [`NodeId`] when it is built, and its first and last token
//! are recorded in [`NodeRanges`] under that id.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::{
        ast::{Expr, ExprKind, NodeId, NodeRanges, ParsedFile},
        expressions::{BinaryOp, UnaryOp},
        statements::Block,
    },
    context::context::CompilerCtx,
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
};

use super::{
    expr::parse_expr,
    lookups::{create_token_lookups, BindingPower, LEDLookup, NUDHandler, NUDLookup, PrefixLookup},
    stmt::{parse_block, parse_top_level_item},
};

/// The main parser structure that maintains parsing state.
///
/// Pulls tokens from the lexer on demand. Lexical and syntax errors are
/// recorded in the [`CompilerCtx`] and returned, so parsing stops at the first
/// one.
pub struct Parser<'ctx> {
    /// Token source with one token of lookahead
    lexer: Lexer,
    /// Receives every reported syntax error
    ctx: &'ctx mut CompilerCtx,
    /// Start and end token of every node built so far
    ranges: NodeRanges,
    /// Lookup table for atom handlers
    nud_lookup: NUDLookup,
    /// Lookup table for infix operators and their binding power
    led_lookup: LEDLookup,
    /// Lookup table for prefix operators
    prefix_lookup: PrefixLookup,
}

impl<'ctx> Parser<'ctx> {
    /// Creates a new Parser with its lookup tables filled in.
    pub fn new(lexer: Lexer, ctx: &'ctx mut CompilerCtx) -> Self {
        let mut parser = Parser {
            lexer,
            ctx,
            ranges: NodeRanges::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            prefix_lookup: HashMap::new(),
        };

        create_token_lookups(&mut parser);
        parser
    }

    /// Parses top level items until the end of the file.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %self.lexer.file().name))]
    pub fn parse_file(mut self) -> Result<ParsedFile, Error> {
        let mut items = vec![];

        while self.has_tokens()? {
            items.push(parse_top_level_item(&mut self)?);
        }

        debug!(items = items.len(), nodes = self.ranges.len(), "parsed file");

        Ok(ParsedFile {
            file: self.lexer.file().clone(),
            items,
            ranges: self.ranges,
        })
    }

    pub fn parse_expr(&mut self) -> Result<Expr, Error> {
        parse_expr(self, BindingPower::Default.left())
    }

    pub fn parse_block(&mut self) -> Result<Block, Error> {
        parse_block(self)
    }

    /// Gives up the source ranges recorded so far.
    pub fn into_ranges(self) -> NodeRanges {
        self.ranges
    }

    /// Returns the kind of the next token without consuming it.
    pub fn peek(&mut self) -> Result<TokenKind, Error> {
        Ok(self.peek_token()?.kind)
    }

    pub fn peek_token(&mut self) -> Result<Token, Error> {
        match self.lexer.peek_token() {
            Ok(token) => Ok(token),
            Err(error) => Err(self.ctx.report_parse_error(error)),
        }
    }

    /// Consumes and returns the next token.
    pub fn advance(&mut self) -> Result<Token, Error> {
        match self.lexer.next() {
            Ok(token) => Ok(token),
            Err(error) => Err(self.ctx.report_parse_error(error)),
        }
    }

    /// Consumes the next token, which must be of kind `expected_kind`.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        let token = self.advance()?;

        if token.kind != expected_kind {
            return Err(self.report_wrong_token_type(token, &[expected_kind]));
        }

        Ok(token)
    }

    pub fn match_consume(&mut self, kind: TokenKind) -> Result<bool, Error> {
        if self.peek()? == kind {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&mut self) -> Result<bool, Error> {
        Ok(self.peek()? != TokenKind::EOF)
    }

    /// Records an unexpected token error located at `token`.
    pub fn report_wrong_token_type(&mut self, token: Token, expected: &[TokenKind]) -> Error {
        let error = ErrorImpl::UnexpectedToken {
            found: token.kind,
            expected: expected.to_vec(),
        };

        let error = match self.ctx.get_token_span(&token) {
            Ok(span) => Error::new(error, span),
            Err(_) => Error::without_span(error),
        };

        self.ctx.report_parse_error(error)
    }

    /// Records an unexpected token error located at the next token.
    pub fn report_unexpected(&mut self, expected: &[TokenKind]) -> Error {
        match self.peek_token() {
            Ok(token) => self.report_wrong_token_type(token, expected),
            Err(error) => error,
        }
    }

    pub fn source_of(&self, token: &Token) -> String {
        self.lexer.get_source_of(token).to_string()
    }

    /// Allocates a node id covering `start..=end`.
    pub fn stamp(&mut self, start: Token, end: Token) -> NodeId {
        let id = self.ranges.next_id();
        self.ranges.stamp(id, start, end);
        id
    }

    /// Builds an expression node covering `start..=end`.
    pub fn new_expr(&mut self, kind: ExprKind, start: Token, end: Token) -> Expr {
        Expr {
            id: self.stamp(start, end),
            kind,
        }
    }

    pub fn start_of(&self, id: NodeId) -> Result<Token, Error> {
        self.ranges.start_of(id)
    }

    pub fn end_of(&self, id: NodeId) -> Result<Token, Error> {
        self.ranges.end_of(id)
    }

    /// Registers an infix operator.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, operator: BinaryOp) {
        self.led_lookup.insert(kind, (operator, binding_power));
    }

    /// Registers a prefix operator.
    pub fn prefix(&mut self, kind: TokenKind, operator: UnaryOp) {
        self.prefix_lookup.insert(kind, operator);
    }

    /// Registers an atom handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    pub fn get_led(&self, kind: TokenKind) -> Option<(BinaryOp, BindingPower)> {
        self.led_lookup.get(&kind).copied()
    }

    pub fn get_prefix(&self, kind: TokenKind) -> Option<UnaryOp> {
        self.prefix_lookup.get(&kind).copied()
    }

    pub fn get_nud(&self, kind: TokenKind) -> Option<NUDHandler> {
        self.nud_lookup.get(&kind).copied()
    }
}
