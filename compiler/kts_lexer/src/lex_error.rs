//! Tokenizer faults.
//!
//! Malformed input never aborts lexing. It becomes a `TokenKind::Error`
//! token plus a [`LexError`], and the parser decides whether the fault
//! matters (it only does when a parse attempt gets stuck on it).

use kts_ir::Span;

/// What went wrong while tokenizing.
///
/// Also the `logos` error type, hence `Default`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[default]
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated raw string literal")]
    UnterminatedRawString,
    #[error("unterminated block comment")]
    UnterminatedComment,
}

/// A tokenizer fault and where it happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {span}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    #[inline]
    pub const fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { kind, span }
    }
}
