//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorKind, ErrorTip};
use crate::lexer::tokens::TokenKind;
use crate::type_checker::type_info::TypeInfo;
use crate::get_source_span;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnexpectedCharacter { character: '@' },
        get_source_span("let @", 4, 5),
    );

    assert_eq!(error.get_error_name(), "UnexpectedCharacter");
    assert_eq!(error.kind(), ErrorKind::Syntax);
}

#[test]
fn test_error_span() {
    let error = Error::new(
        ErrorImpl::UnknownSymbol {
            name: "x".to_string(),
        },
        get_source_span("a + x", 4, 5),
    );

    let span = error.get_span().unwrap();
    assert_eq!(span.start.offset, 4);
    assert_eq!(span.text, "x");
}

#[test]
fn test_error_display_with_span() {
    let error = Error::new(
        ErrorImpl::UnknownSymbol {
            name: "x".to_string(),
        },
        get_source_span("a + x", 4, 5),
    );

    assert_eq!(error.to_string(), "[L1:5] 'x': unknown symbol: x");
}

#[test]
fn test_error_display_without_span() {
    let error = Error::without_span(ErrorImpl::DivisionByZero);

    assert_eq!(error.to_string(), "division by zero");
    assert_eq!(error.kind(), ErrorKind::Runtime);
}

#[test]
fn test_or_span_keeps_existing_span() {
    let error = Error::new(ErrorImpl::ReturnOutsideFunction, get_source_span("return", 0, 6))
        .or_span(Some(get_source_span("return 1", 7, 8)));

    assert_eq!(error.get_span().unwrap().text, "return");

    let error = Error::without_span(ErrorImpl::ReturnOutsideFunction)
        .or_span(Some(get_source_span("return 1", 7, 8)));

    assert_eq!(error.get_span().unwrap().text, "1");
}

#[test]
fn test_unexpected_token_error() {
    let error = Error::without_span(ErrorImpl::UnexpectedToken {
        found: TokenKind::CloseCurly,
        expected: vec![TokenKind::Semicolon],
    });

    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(error.message(), "got `}`, expected `;`");
    assert!(matches!(error.get_tip(), ErrorTip::Suggestion(_)));
}

#[test]
fn test_unexpected_token_lists_alternatives() {
    let error = Error::without_span(ErrorImpl::UnexpectedToken {
        found: TokenKind::EOF,
        expected: vec![TokenKind::Comma, TokenKind::CloseParen],
    });

    assert_eq!(error.message(), "got `<EOF>`, expected one of [`,`, `)`]");
}

#[test]
fn test_type_mismatch_error() {
    let error = Error::without_span(ErrorImpl::TypeMatchError {
        expected: TypeInfo::I32,
        received: TypeInfo::Bool,
    });

    assert_eq!(error.get_error_name(), "TypeMatchError");
    assert_eq!(error.kind(), ErrorKind::Semantic);
    assert_eq!(error.get_tip().to_string(), "Expected type `i32`, received `bool`");
}

#[test]
fn test_function_already_declared_error() {
    let error = Error::without_span(ErrorImpl::FunctionAlreadyDeclared {
        function: "main".to_string(),
    });

    assert_eq!(error.get_error_name(), "FunctionAlreadyDeclared");
}

#[test]
fn test_internal_errors() {
    let error = Error::without_span(ErrorImpl::ReturnMismatch {
        expected: "f".to_string(),
        found: "g".to_string(),
    });

    assert_eq!(error.kind(), ErrorKind::Internal);
    assert!(matches!(error.get_tip(), ErrorTip::None));
}
