#![allow(clippy::module_inception)]

use std::sync::Once;

pub mod ast;
pub mod context;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// A resolved position inside a source file. `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// A human readable source range, only ever used for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
    pub text: String,
}

impl SourceSpan {
    pub fn formatted_location(&self) -> String {
        if self.start.offset == self.end.offset {
            format!("L{}:{}", self.start.line, self.start.column)
        } else if self.start.line == self.end.line {
            format!("L{}:{}-{}", self.start.line, self.start.column, self.end.column)
        } else {
            format!(
                "L{}:{} - L{}-{}",
                self.start.line, self.start.column, self.end.line, self.end.column
            )
        }
    }
}

/// Scans `content` from the beginning up to `offset`, counting lines and columns.
pub fn get_source_location(content: &str, offset: usize) -> SourceLocation {
    let mut line = 1;
    let mut column = 1;

    for (index, c) in content.char_indices() {
        if index >= offset {
            break;
        }

        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    SourceLocation {
        offset,
        line,
        column,
    }
}

/// Resolves the half-open byte range `start..end` of `content`.
///
/// The end location points at the last character of the range, so a
/// single character span starts and ends on the same column.
pub fn get_source_span(content: &str, start: usize, end: usize) -> SourceSpan {
    let last = if end > start { end - 1 } else { start };

    SourceSpan {
        start: get_source_location(content, start),
        end: get_source_location(content, last),
        text: content.get(start..end).unwrap_or_default().to_string(),
    }
}

static TRACING_INIT: Once = Once::new();

/// Installs a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::{get_source_location, get_source_span};

    #[test]
    fn test_get_source_location() {
        let content = "Hello, world!\nfoo\n\nTesting { }\n";

        let location = get_source_location(content, 10);
        assert_eq!(location.line, 1);
        assert_eq!(location.column, 11);

        let location = get_source_location(content, 27);
        assert_eq!(location.line, 4);
        assert_eq!(location.column, 9);
    }

    #[test]
    fn test_source_span_formatting() {
        let content = "let a: i32 = 1;\nlet b: i32 =\n  2;";

        let span = get_source_span(content, 4, 5);
        assert_eq!(span.text, "a");
        assert_eq!(span.formatted_location(), "L1:5");

        let span = get_source_span(content, 0, 3);
        assert_eq!(span.text, "let");
        assert_eq!(span.formatted_location(), "L1:1-3");

        let span = get_source_span(content, 16, 32);
        assert_eq!(span.formatted_location(), "L2:1 - L3-3");
    }

    #[test]
    fn test_empty_span_at_end_of_input() {
        let content = "abc";
        let span = get_source_span(content, 3, 3);

        assert_eq!(span.text, "");
        assert_eq!(span.start.column, 4);
        assert_eq!(span.formatted_location(), "L1:4");
    }
}
