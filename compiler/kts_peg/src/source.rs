//! The token stream contract the combinators run against.

use std::fmt;

use kts_ir::{Span, TokenFlags, TokenKind, TokenList};

/// Position-addressable sequence of typed tokens.
///
/// Indices run `0..len()`. The last token must be an end-of-input marker
/// that no grammar rule consumes; the cursor never moves past it.
pub trait TokenSource {
    /// Token kind tag compared by [`token`](crate::token).
    type Kind: Copy + Eq + fmt::Debug + Send + Sync + 'static;

    /// Number of tokens including the end-of-input marker.
    fn len(&self) -> usize;

    fn kind(&self, index: usize) -> Self::Kind;

    /// Source text of the token at `index`.
    fn text(&self, index: usize) -> &str;

    /// Byte span of the token at `index`.
    fn span(&self, index: usize) -> Span;

    /// Whether the token can serve as a (soft-keyword) identifier.
    fn is_identifier(&self, index: usize) -> bool;

    /// Whether a line break separates the token from its predecessor.
    fn newline_before(&self, index: usize) -> bool;

    /// Name used in "expected ..." failure reasons.
    fn describe(kind: Self::Kind) -> String {
        format!("{kind:?}")
    }
}

impl TokenSource for TokenList {
    type Kind = TokenKind;

    #[inline]
    fn len(&self) -> usize {
        TokenList::len(self)
    }

    #[inline]
    fn kind(&self, index: usize) -> TokenKind {
        self[index].kind
    }

    #[inline]
    fn text(&self, index: usize) -> &str {
        TokenList::text(self, index)
    }

    #[inline]
    fn span(&self, index: usize) -> Span {
        self[index].span
    }

    #[inline]
    fn is_identifier(&self, index: usize) -> bool {
        self[index].kind == TokenKind::Identifier
    }

    #[inline]
    fn newline_before(&self, index: usize) -> bool {
        self[index].flags.contains(TokenFlags::NEWLINE_BEFORE)
    }

    fn describe(kind: TokenKind) -> String {
        kind.display_name().to_owned()
    }
}
