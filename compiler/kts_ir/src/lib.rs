//! Shared vocabulary for the kts annotation scanner.
//!
//! `kts_lexer` produces a [`TokenList`]; `kts_peg` and `kts_parse` consume it.
//! Keeping these types here lets the parser depend on tokens without
//! depending on the lexer.

mod span;
mod token;

pub use span::{Span, SpanError};
pub use token::{Token, TokenFlags, TokenKind, TokenList};
