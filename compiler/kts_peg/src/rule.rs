//! Shareable grammar rules.

use std::fmt;
use std::sync::Arc;

use crate::{Cursor, ParseResult, TokenSource};

pub(crate) type RuleFn<S, T> = dyn Fn(&mut Cursor<'_, S>) -> ParseResult<T> + Send + Sync;

/// A parser from cursor to [`ParseResult`].
///
/// Cloning is cheap (reference counted). Rules are immutable once built;
/// self-reference goes through [`Recursive`](crate::Recursive).
pub struct Rule<S: TokenSource + 'static, T: 'static> {
    pub(crate) f: Arc<RuleFn<S, T>>,
}

impl<S: TokenSource + 'static, T: 'static> Rule<S, T> {
    /// Wrap a hand-written parse function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Cursor<'_, S>) -> ParseResult<T> + Send + Sync + 'static,
    {
        Rule { f: Arc::new(f) }
    }

    /// Apply the rule at the cursor.
    ///
    /// On failure the cursor is back where it started, whatever the
    /// underlying function did.
    pub fn parse(&self, cursor: &mut Cursor<'_, S>) -> ParseResult<T> {
        let start = cursor.position();
        let result = (self.f)(cursor);
        if result.is_failure() {
            cursor.restore(start);
        }
        result
    }

    /// Transform the success value.
    #[must_use]
    pub fn map<U: 'static>(&self, f: impl Fn(T) -> U + Send + Sync + 'static) -> Rule<S, U> {
        let inner = self.clone();
        Rule::new(move |cursor| inner.parse(cursor).map(&f))
    }
}

impl<S: TokenSource + 'static, T: 'static> Clone for Rule<S, T> {
    fn clone(&self) -> Self {
        Rule {
            f: Arc::clone(&self.f),
        }
    }
}

impl<S: TokenSource + 'static, T: 'static> fmt::Debug for Rule<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").finish_non_exhaustive()
    }
}
