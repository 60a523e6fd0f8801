//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers (including `-` and trailing `?`)
//! - Number literals
//! - Operators and punctuation
//! - Comments and whitespace
//! - Lookahead and EOF behavior
//! - Error cases

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use pretty_assertions::assert_eq;
use tracing::{Event, Subscriber};
use tracing_subscriber::{layer, prelude::*, Layer};

use crate::context::context::{tokenize, CompilerCtx};
use crate::errors::errors::{ErrorImpl, ErrorKind};

use super::tokens::TokenKind;

#[test]
fn test_tokenize_keywords() {
    let tokens = tokenize("func while if else let true false return").unwrap();

    assert_eq!(
        tokens,
        vec![
            TokenKind::Func,
            TokenKind::While,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::Let,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Return,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let mut ctx = CompilerCtx::new();
    let file = ctx.add_in_memory_file("anon-file", "foo baz_123 _underscore listEmpty? my-variable functional");
    let mut lexer = ctx.create_tokenizer(&file);
    let tokens = lexer.tokenize_all().unwrap();

    let texts = tokens
        .iter()
        .map(|token| lexer.get_source_of(token))
        .collect::<Vec<&str>>();

    assert!(tokens.iter().all(|token| token.kind == TokenKind::Identifier));
    assert_eq!(
        texts,
        vec!["foo", "baz_123", "_underscore", "listEmpty?", "my-variable", "functional"]
    );
}

#[test]
fn test_tokenize_question_mark_must_end_identifier() {
    let error = tokenize("foo?bar").unwrap_err();

    assert_eq!(error.get_error_name(), "MalformedIdentifier");
    assert_eq!(error.kind(), ErrorKind::Syntax);
    assert_eq!(error.get_span().unwrap().text, "foo?");

    assert!(tokenize("foo??").is_err());
    assert!(tokenize("foo?-").is_err());
    assert_eq!(
        tokenize("empty?(x)").unwrap(),
        vec![
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::CloseParen
        ]
    );
}

#[test]
fn test_dash_inside_identifier() {
    // A dash directly after an identifier continues it
    assert_eq!(tokenize("n-1").unwrap(), vec![TokenKind::Identifier]);
    assert_eq!(
        tokenize("n - 1").unwrap(),
        vec![TokenKind::Identifier, TokenKind::Dash, TokenKind::Number]
    );
}

#[test]
fn test_tokenize_numbers() {
    let mut ctx = CompilerCtx::new();
    let file = ctx.add_in_memory_file("anon-file", "42 0 -7 100");
    let mut lexer = ctx.create_tokenizer(&file);
    let tokens = lexer.tokenize_all().unwrap();

    let kinds = tokens.iter().map(|token| token.kind).collect::<Vec<TokenKind>>();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Number,
            TokenKind::Number,
            TokenKind::Dash,
            TokenKind::Number,
            TokenKind::Number
        ]
    );
    assert_eq!(lexer.get_source_of(&tokens[0]), "42");
    assert_eq!(lexer.get_source_of(&tokens[3]), "7");
}

#[test]
fn test_tokenize_operators() {
    let tokens = tokenize("+ - * / && || = == ! != < <= > >= ->").unwrap();

    assert_eq!(
        tokens,
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Assignment,
            TokenKind::Equals,
            TokenKind::Not,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::LessEquals,
            TokenKind::Greater,
            TokenKind::GreaterEquals,
            TokenKind::Arrow,
        ]
    );
}

#[test]
fn test_tokenize_operators_without_whitespace() {
    let tokens = tokenize("a<=b==!c").unwrap();

    assert_eq!(
        tokens,
        vec![
            TokenKind::Identifier,
            TokenKind::LessEquals,
            TokenKind::Identifier,
            TokenKind::Equals,
            TokenKind::Not,
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    let tokens = tokenize("( ) { } ; : ,").unwrap();

    assert_eq!(
        tokens,
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::Comma,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let source = "let x // this is a comment\n// another one\nlet y";
    let tokens = tokenize(source).unwrap();

    assert_eq!(
        tokens,
        vec![
            TokenKind::Let,
            TokenKind::Identifier,
            TokenKind::Let,
            TokenKind::Identifier
        ]
    );
}

#[test]
fn test_tokenize_unrecognized_character() {
    let error = tokenize("let @").unwrap_err();

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnexpectedCharacter { character: '@' }
    );
    assert_eq!(error.get_span().unwrap().formatted_location(), "L1:5");
}

#[test]
fn test_lone_ampersand_and_pipe() {
    assert_eq!(tokenize("a & b").unwrap_err().get_error_name(), "UnexpectedCharacter");
    assert_eq!(tokenize("a | b").unwrap_err().get_error_name(), "UnexpectedCharacter");
}

#[test]
fn test_lexer_errors_are_recorded() {
    let mut ctx = CompilerCtx::new();
    let file = ctx.add_in_memory_file("anon-file", "a # b");

    assert!(ctx.tokenize_all(&file).is_err());
    assert!(ctx.did_error());
    assert_eq!(ctx.get_compile_errors().len(), 1);
}

#[test]
fn test_eof_is_idempotent() {
    let mut ctx = CompilerCtx::new();
    let file = ctx.add_in_memory_file("anon-file", "x  ");
    let mut lexer = ctx.create_tokenizer(&file);

    assert_eq!(lexer.next().unwrap().kind, TokenKind::Identifier);
    assert_eq!(lexer.peek().unwrap(), TokenKind::EOF);
    assert_eq!(lexer.peek().unwrap(), TokenKind::EOF);
    assert!(!lexer.has_next().unwrap());

    let eof = lexer.next().unwrap();
    assert_eq!(eof.kind, TokenKind::EOF);
    assert_eq!(eof.start_offset, 3);
    assert_eq!(lexer.next().unwrap(), eof);
}

#[test]
fn test_peek_does_not_consume() {
    let mut ctx = CompilerCtx::new();
    let file = ctx.add_in_memory_file("anon-file", "let x");
    let mut lexer = ctx.create_tokenizer(&file);

    assert_eq!(lexer.peek().unwrap(), TokenKind::Let);
    assert_eq!(lexer.peek().unwrap(), TokenKind::Let);
    assert!(!lexer.match_consume(TokenKind::Identifier).unwrap());
    assert!(lexer.match_consume(TokenKind::Let).unwrap());
    assert_eq!(lexer.peek().unwrap(), TokenKind::Identifier);
}

#[test]
fn test_tokens_reconstruct_source() {
    let source = "func main ( ) -> i32 {\n    let is-empty? : bool = a <= b && !c ;\n\treturn 12 ;\n}";
    let mut ctx = CompilerCtx::new();
    let file = ctx.add_in_memory_file("anon-file", source);
    let mut lexer = ctx.create_tokenizer(&file);
    let tokens = lexer.tokenize_all().unwrap();

    let mut rebuilt = String::new();
    let mut last_end = 0;
    for token in &tokens {
        rebuilt.push_str(&source[last_end..token.start_offset]);
        rebuilt.push_str(lexer.get_source_of(token));
        last_end = token.end_offset;
    }
    rebuilt.push_str(&source[last_end..]);

    assert_eq!(rebuilt, source);
    assert!(tokens
        .iter()
        .all(|token| source[token.start_offset..token.end_offset].trim() == lexer.get_source_of(token)));
}

#[test]
fn test_token_format() {
    let mut ctx = CompilerCtx::new();
    let file = ctx.add_in_memory_file("anon-file", "let foo;\n  bar");
    let tokens = ctx.tokenize_all(&file).unwrap();

    let formatted = tokens
        .iter()
        .map(|token| token.format(&ctx).unwrap())
        .collect::<Vec<String>>();

    assert_eq!(
        formatted,
        vec![
            "Token[Let L1:1-3]",
            "Token[foo Identifier L1:5-7]",
            "Token[Semicolon L1:8]",
            "Token[bar Identifier L2:3-5]",
        ]
    );
}

/// Counts events emitted from the lexer module.
struct LexerEvents(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for LexerEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: layer::Context<'_, S>) {
        if event.metadata().target() == "toyc::lexer::lexer" {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[test]
fn test_every_token_is_traced() {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(LexerEvents(Arc::clone(&count)));

    let tokens = tracing::subscriber::with_default(subscriber, || {
        tracing::callsite::rebuild_interest_cache();
        tokenize("let x = foo(1);").unwrap()
    });

    // Identifiers, numbers and operators all count, plus the final EOF
    assert_eq!(tokens.len(), 8);
    assert_eq!(count.load(Ordering::SeqCst), 9);
}
