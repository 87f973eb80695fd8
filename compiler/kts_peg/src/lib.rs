//! Backtracking parsing-expression-grammar combinators over token streams.
//!
//! Grammars are built once from [`Rule`] values and then applied to any
//! number of [`Cursor`]s. The building blocks:
//!
//! - [`TokenSource`]: the token stream contract (implemented for
//!   [`kts_ir::TokenList`]).
//! - [`Cursor`] / [`Position`]: per-parse state and cheap snapshots.
//! - [`ParseResult`] / [`Failure`]: success with the new position, or a
//!   reason and the offset where recognition failed.
//! - Combinators: [`token`], [`symbol`], [`soft_keyword`], [`sequence`],
//!   [`choice`], [`optional`], [`zero_or_more`], [`one_or_more`],
//!   [`wrapped`], [`followed_by`], [`not_ahead`], [`line_break`],
//!   [`ignore_newlines`], [`respect_newlines`], [`not_implemented`].
//! - [`Recursive`] / [`Definitions`]: forward references for recursive
//!   grammars, with a per-cursor depth limit and memoized results.
//! - [`traced`]: opt-in rule tracing.
//!
//! # Semantics
//!
//! Choice is ordered (the first matching alternative wins, PEG style) and
//! every failing rule leaves the cursor where it was. Results of recursive
//! rules are memoized per cursor, which keeps backtracking linear in the
//! input.
//!
//! A failed [`choice`] reports the failure of the alternative that got
//! furthest (ties go to the earliest alternative). Independently, the
//! cursor remembers the deepest failure of the whole attempt, which is the
//! better diagnostic for a failed top-level parse.

mod combinators;
mod cursor;
mod recursive;
mod result;
mod rule;
mod source;
mod trace;

#[cfg(test)]
mod fixture;

pub use combinators::{
    choice, followed_by, ignore_newlines, line_break, not_ahead, not_implemented, one_or_more,
    optional, respect_newlines, sequence, soft_keyword, symbol, token, wrapped, zero_or_more,
};
pub use cursor::{Cursor, Position, DEFAULT_MAX_DEPTH};
pub use recursive::{Definitions, Recursive};
pub use result::{Failure, ParseResult, Reason};
pub use rule::Rule;
pub use source::TokenSource;
pub use trace::{traced, TraceEvent, TraceOutcome};
