use std::{collections::BTreeMap, io::Write, path::PathBuf, rc::Rc};

use tracing::debug;

use crate::{
    ast::ast::{Expr, NodeId, NodeRanges, ParsedFile},
    errors::errors::{Error, ErrorImpl},
    get_source_span,
    interpreter::{interpreter::Interpreter, value::Value},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    parser::parser::Parser,
    type_checker::type_checker::TypeChecker,
    SourceSpan,
};

/// One unit of source text. Immutable once registered.
#[derive(Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub uid: u32,
    pub path: Option<PathBuf>,
    pub name: String,
    pub contents: String,
}

/// State shared by the phases of one compilation: the registered files and
/// the syntax errors reported so far.
#[derive(Debug)]
pub struct CompilerCtx {
    next_uid: u32,
    files: BTreeMap<u32, Rc<SourceFile>>,
    errors: Vec<Error>,
}

impl Default for CompilerCtx {
    fn default() -> Self {
        CompilerCtx::new()
    }
}

impl CompilerCtx {
    pub fn new() -> Self {
        CompilerCtx {
            next_uid: 1,
            files: BTreeMap::new(),
            errors: vec![],
        }
    }

    fn register(&mut self, path: Option<PathBuf>, name: String, contents: String) -> Rc<SourceFile> {
        let file = Rc::new(SourceFile {
            uid: self.next_uid,
            path,
            name,
            contents,
        });

        self.next_uid += 1;
        self.files.insert(file.uid, Rc::clone(&file));
        debug!(uid = file.uid, name = %file.name, "registered source file");
        file
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, name: &str, contents: impl Into<String>) -> Rc<SourceFile> {
        self.register(Some(path.into()), name.to_string(), contents.into())
    }

    /// Registers a file that does not exist on disk, named `<name>-<uid>`.
    pub fn add_in_memory_file(&mut self, name: &str, contents: impl Into<String>) -> Rc<SourceFile> {
        let name = format!("{}-{}", name, self.next_uid);
        self.register(None, name, contents.into())
    }

    pub fn get_file(&self, uid: u32) -> Result<&Rc<SourceFile>, Error> {
        self.files
            .get(&uid)
            .ok_or_else(|| Error::without_span(ErrorImpl::UnknownFile { uid }))
    }

    pub fn create_tokenizer(&self, file: &Rc<SourceFile>) -> Lexer {
        Lexer::new(Rc::clone(file))
    }

    pub fn create_parser(&mut self, file: &Rc<SourceFile>) -> Parser<'_> {
        let lexer = self.create_tokenizer(file);
        Parser::new(lexer, self)
    }

    pub fn get_source_span(&self, file_uid: u32, start: usize, end: usize) -> Result<SourceSpan, Error> {
        let file = self.get_file(file_uid)?;
        Ok(get_source_span(&file.contents, start, end))
    }

    pub fn get_token_span(&self, token: &Token) -> Result<SourceSpan, Error> {
        self.get_source_span(token.file_uid, token.start_offset, token.end_offset)
    }

    /// Span from the start of a node's first token to the end of its last one.
    pub fn get_node_span(&self, ranges: &NodeRanges, id: NodeId) -> Result<SourceSpan, Error> {
        let start = ranges.start_of(id)?;
        let end = ranges.end_of(id)?;

        if start.file_uid != end.file_uid {
            return Err(Error::without_span(ErrorImpl::UnknownFile { uid: end.file_uid }));
        }

        self.get_source_span(start.file_uid, start.start_offset, end.end_offset)
    }

    /// Records a syntax error and hands it back so the caller can unwind with it.
    pub fn report_parse_error(&mut self, error: Error) -> Error {
        debug!(error = %error, "syntax error");
        self.errors.push(error.clone());
        error
    }

    /// Tokenizes a whole file, recording the first lexical error if any.
    pub fn tokenize_all(&mut self, file: &Rc<SourceFile>) -> Result<Vec<Token>, Error> {
        let mut lexer = self.create_tokenizer(file);
        lexer.tokenize_all().map_err(|error| self.report_parse_error(error))
    }

    pub fn get_compile_errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn did_error(&self) -> bool {
        !self.errors.is_empty()
    }

    fn first_error(&self) -> Option<Error> {
        self.errors.first().cloned()
    }
}

/// Helper for trying out the lexer on a string.
pub fn tokenize(source: &str) -> Result<Vec<TokenKind>, Error> {
    let mut ctx = CompilerCtx::new();
    let file = ctx.add_in_memory_file("anon-file", source);
    let tokens = ctx.tokenize_all(&file)?;

    Ok(tokens.iter().map(|token| token.kind).collect())
}

/// Helper for trying out the parser on a whole file.
pub fn parse_file(source: &str) -> Result<ParsedFile, Error> {
    let mut ctx = CompilerCtx::new();
    let file = ctx.add_in_memory_file("anon-file", source);
    let parsed = ctx.create_parser(&file).parse_file()?;

    match ctx.first_error() {
        Some(error) => Err(error),
        None => Ok(parsed),
    }
}

/// Helper for trying out the parser on a single expression.
pub fn parse_expr(source: &str) -> Result<Expr, Error> {
    let mut ctx = CompilerCtx::new();
    let file = ctx.add_in_memory_file("anon-file", source);
    let mut parser = ctx.create_parser(&file);
    let expr = parser.parse_expr()?;
    parser.expect(TokenKind::EOF)?;

    Ok(expr)
}

/// Helper for trying out the type checker.
pub fn check_types(source: &str) -> Result<(), Error> {
    let parsed = parse_file(source)?;
    TypeChecker::new().check_file(&parsed)?;

    Ok(())
}

/// Parses, checks and runs `source` from its `main` function, writing
/// program output to `out`.
pub fn interpret<W: Write>(source: &str, out: W) -> Result<Value, Error> {
    let parsed = parse_file(source)?;
    let file_scope = TypeChecker::new().check_file(&parsed)?;

    Interpreter::with_output(&file_scope, out).run_from_entrypoint()
}
