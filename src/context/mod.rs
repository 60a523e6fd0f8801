//! Compilation context.
//!
//! Owns the registered source files and the list of syntax errors reported
//! while tokenizing and parsing, and offers helpers that run the pipeline
//! over an in-memory string.

pub mod context;
