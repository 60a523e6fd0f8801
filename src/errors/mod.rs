//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the compilation
//! process. It includes:
//!
//! - Error structures with optional source span information
//! - Specific error variants for every compilation phase
//! - The error kind used to tell syntax, semantic, runtime and internal errors apart
//! - Error formatting and helpful suggestions

pub mod errors;

#[cfg(test)]
mod tests;
