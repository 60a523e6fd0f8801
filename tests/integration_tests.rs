//! Integration tests for the whole pipeline.
//!
//! These tests drive sample programs through tokenization, parsing, type
//! checking and interpretation using the public API only.

use std::{fs::read_to_string, path::PathBuf};

use pretty_assertions::assert_eq;
use toyc::{
    context::context::{check_types, interpret, tokenize, CompilerCtx},
    errors::errors::{ErrorImpl, ErrorKind},
    interpreter::{interpreter::Interpreter, value::Value},
    lexer::tokens::TokenKind,
    type_checker::type_checker::TypeChecker,
};

fn sample(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("samples")
        .join(name);

    read_to_string(path).unwrap()
}

fn run(source: &str) -> String {
    let mut out = Vec::new();
    interpret(source, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_run_fibonacci_sample() {
    assert_eq!(run(&sample("fibonacci.lang")), "0\n1\n1\n2\n3\n");
}

#[test]
fn test_run_factorial_sample() {
    assert_eq!(run(&sample("factorial.lang")), "1\n2\n6\n24\n120\ntrue\n");
}

#[test]
fn test_run_hello_world_sample() {
    assert_eq!(run(&sample("hello_world.lang")), "42\ntrue\nfalse\n");
}

#[test]
fn test_samples_type_check() {
    for name in ["fibonacci.lang", "factorial.lang", "hello_world.lang"] {
        assert!(check_types(&sample(name)).is_ok(), "{} should type check", name);
    }
}

#[test]
fn test_pipeline_through_context() {
    let mut ctx = CompilerCtx::new();
    let file = ctx.add_file("samples/factorial.lang", "factorial.lang", sample("factorial.lang"));

    let parsed = ctx.create_parser(&file).parse_file().unwrap();
    assert!(!ctx.did_error());
    assert!(parsed.check_source_ranges().is_ok());

    let file_scope = TypeChecker::new().check_file(&parsed).unwrap();
    let mut interpreter = Interpreter::with_output(&file_scope, Vec::new());

    assert_eq!(
        interpreter.invoke("factorial", vec![Value::I32(6)]).unwrap(),
        Value::I32(720)
    );
    assert_eq!(interpreter.call_depth(), 0);
}

#[test]
fn test_tokenize_sample_header() {
    let tokens = tokenize("func println(a: i32) {}").unwrap();

    assert_eq!(
        tokens,
        vec![
            TokenKind::Func,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::Identifier,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
        ]
    );
}

#[test]
fn test_lex_error_is_syntax_error() {
    let mut out = Vec::new();
    let error = interpret("func main() { let a: i32 = 1 # 2; }", &mut out).unwrap_err();

    assert_eq!(error.get_impl(), &ErrorImpl::UnexpectedCharacter { character: '#' });
    assert_eq!(error.kind(), ErrorKind::Syntax);
    assert_eq!(error.to_string(), "[L1:30] '#': unexpected character '#'");
}

#[test]
fn test_parse_error_missing_semicolon() {
    let error = check_types("func main() { let a: i32 = 1 let b: i32 = 2; }").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Syntax);
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_semantic_error_has_location() {
    let error = check_types("func main() {\n    let a: i32 = b;\n}").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Semantic);
    assert_eq!(error.to_string(), "[L2:18] 'b': unknown symbol: b");
}

#[test]
fn test_runtime_error_has_location() {
    let mut out = Vec::new();
    let error = interpret(
        "func println(a: i32) {}\nfunc main() {\n    println(1);\n    println(1 / 0);\n}",
        &mut out,
    )
    .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Runtime);
    assert_eq!(error.to_string(), "[L4:13-17] '1 / 0': division by zero");
    assert_eq!(String::from_utf8(out).unwrap(), "1\n");
}

#[test]
fn test_empty_source() {
    let mut out = Vec::new();
    let error = interpret("", &mut out).unwrap_err();

    assert_eq!(error.get_error_name(), "MissingEntrypoint");
}
