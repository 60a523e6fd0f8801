//! Utility macros for the compiler.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_LOOKAHEAD_TOKEN!` - Picks a one or two character token using one character of lookahead
//!
//! These macros reduce boilerplate in the lexer implementation.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$file_uid` - The uid of the file the token was read from
/// * `$start` - Byte offset of the first character
/// * `$end` - Byte offset one past the last character
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, file.uid, 4, 6);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $file_uid:expr, $start:expr, $end:expr) => {
        $crate::lexer::tokens::Token {
            kind: $kind,
            file_uid: $file_uid,
            start_offset: $start,
            end_offset: $end,
        }
    };
}

/// Creates either a two character token or its one character prefix.
///
/// Consumes `$second` if it is the next character in the input and emits
/// `$double`, otherwise emits `$single`.
///
/// # Example
///
/// ```ignore
/// '=' => MK_LOOKAHEAD_TOKEN!(self, '=', TokenKind::Equals, TokenKind::Assignment),
/// ```
#[macro_export]
macro_rules! MK_LOOKAHEAD_TOKEN {
    ($lexer:expr, $second:literal, $double:expr, $single:expr) => {
        if $lexer.match_char($second) {
            $lexer.make_token($double)
        } else {
            $lexer.make_token($single)
        }
    };
}
