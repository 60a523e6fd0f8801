/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Node ids, the expression enum, source ranges and the parsed file
/// - expressions: Operators, calls, assignments and returns
/// - statements: Blocks, control flow and declarations
/// - types: Type annotations as written in source
/// - printer: Indented tree dump
pub mod ast;
pub mod expressions;
pub mod printer;
pub mod statements;
pub mod types;
