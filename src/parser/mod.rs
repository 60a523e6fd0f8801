//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Top level items (`func` and `let`)
//! - Expressions (binary and unary operators, calls, assignments, literals)
//! - Blocks and control flow (`if`/`else if`/`else`, `while`, `return`)
//! - Type annotations
//!
//! The first syntax error is recorded in the compilation context and ends
//! the parse.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
