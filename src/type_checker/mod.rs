//! Type checking and semantic analysis module.
//!
//! This module checks a parsed file bottom up and resolves every name in it.
//! It records, keyed by node:
//!
//! - The type of every expression
//! - The symbol every identifier, assignment and `let` refers to
//! - The function every call site invokes
//! - The frame layout of every function
//!
//! Functions of an item list are declared before any item of the list is
//! checked, so they can be called before their declaration.

pub mod symbol_table;
pub mod symbols;
pub mod type_checker;
pub mod type_info;

#[cfg(test)]
mod tests;
