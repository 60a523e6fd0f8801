//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - On demand tokenization with a single token of lookahead
//! - Recognition of keywords, identifiers, number literals and operators
//! - Byte offset tracking for error reporting
//! - Line comments and whitespace handling

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
