//! Token cursor for navigating a [`TokenSource`].
//!
//! The cursor is the only mutable parse state: a token index, the current
//! recursion depth, whether line breaks are significant, the furthest
//! failure seen so far, the memo table of recursive rule results and an
//! optional trace log. Snapshots are plain [`Position`] values, so
//! backtracking is a single store.

use std::any::Any;

use kts_ir::Span;
use rustc_hash::FxHashMap;

use crate::result::{Failure, ParseResult, Reason};
use crate::trace::TraceEvent;
use crate::TokenSource;

/// Recursion depth limit used by [`Cursor::new`].
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Snapshot of a cursor's token index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(usize);

impl Position {
    /// Index of the token the cursor was at.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Memo table key: a recursive rule applied at a token index under the
/// cursor's current mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct MemoKey {
    rule: usize,
    pos: usize,
    newlines: bool,
    quiet: bool,
}

/// Cursor over a token source.
///
/// Invariant: `pos < source.len()`. The last token is the end-of-input
/// marker, and [`advance`](Self::advance) never moves past it.
pub struct Cursor<'a, S: TokenSource> {
    source: &'a S,
    pos: usize,
    depth: usize,
    max_depth: usize,
    /// Deepest failure reported through [`fail`](Self::fail).
    furthest: Option<Failure>,
    /// Active lookaheads; failures inside them are not diagnostics.
    quiet: u32,
    /// Whether [`line_break`](crate::line_break) sees line breaks.
    newlines: bool,
    /// Results of recursive rules, each a boxed `ParseResult<T>`.
    memo: FxHashMap<MemoKey, Box<dyn Any>>,
    trace: Option<Vec<TraceEvent>>,
}

impl<'a, S: TokenSource> Cursor<'a, S> {
    /// Create a cursor at the first token.
    pub fn new(source: &'a S) -> Self {
        debug_assert!(source.len() > 0, "token source must end with an end-of-input token");
        Cursor {
            source,
            pos: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            furthest: None,
            quiet: 0,
            newlines: true,
            memo: FxHashMap::default(),
            trace: None,
        }
    }

    /// Limit how many recursive rule invocations may be active at once.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Start at token `index` instead of the first token.
    ///
    /// Indices past the end are clamped to the end-of-input token.
    #[must_use]
    pub fn at_index(mut self, index: usize) -> Self {
        self.pos = index.min(self.last_index());
        self
    }

    /// Record a [`TraceEvent`] for every traced rule invocation.
    #[must_use]
    pub fn with_trace_log(mut self) -> Self {
        self.trace = Some(Vec::new());
        self
    }

    #[inline]
    pub fn source(&self) -> &'a S {
        self.source
    }

    /// Snapshot the current position.
    #[inline]
    pub fn position(&self) -> Position {
        Position(self.pos)
    }

    /// Roll back to a snapshot taken from this cursor.
    #[inline]
    pub fn restore(&mut self, position: Position) {
        debug_assert!(
            position.0 < self.source.len(),
            "cursor position {} out of bounds (max {})",
            position.0,
            self.source.len()
        );
        self.pos = position.0;
    }

    #[inline]
    pub fn current_kind(&self) -> S::Kind {
        self.source.kind(self.pos)
    }

    #[inline]
    pub fn current_text(&self) -> &'a str {
        self.source.text(self.pos)
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.source.span(self.pos)
    }

    #[inline]
    pub fn current_is_identifier(&self) -> bool {
        self.source.is_identifier(self.pos)
    }

    #[inline]
    pub fn newline_before_current(&self) -> bool {
        self.source.newline_before(self.pos)
    }

    /// Whether line breaks are currently significant. True for a new cursor.
    #[inline]
    pub fn newlines_significant(&self) -> bool {
        self.newlines
    }

    /// Run `f` with line-break significance set to `significant`, restoring
    /// the previous setting afterwards.
    pub(crate) fn with_newlines<R>(
        &mut self,
        significant: bool,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved = std::mem::replace(&mut self.newlines, significant);
        let result = f(self);
        self.newlines = saved;
        result
    }

    /// Whether the cursor sits on the end-of-input token.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos == self.last_index()
    }

    /// Byte offset of the current token.
    ///
    /// After a successful parse this is the end of everything consumed,
    /// trailing trivia included.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.current_span().start
    }

    /// Consume the current token and return its span.
    pub fn advance(&mut self) -> Span {
        let span = self.current_span();
        if self.pos < self.last_index() {
            self.pos += 1;
        }
        span
    }

    /// Span of the tokens consumed since `start`.
    ///
    /// Zero-width at the current token when nothing was consumed.
    pub fn span_since(&self, start: Position) -> Span {
        if self.pos <= start.0 {
            Span::point(self.offset())
        } else {
            self.source
                .span(start.0)
                .merge(self.source.span(self.pos - 1))
        }
    }

    /// A failure at the current position.
    ///
    /// Also remembered as the furthest failure when it is deeper than any
    /// seen before. At equal depth a "not implemented" failure replaces a
    /// plain mismatch; otherwise the earlier one is kept.
    pub fn fail<T>(&mut self, reason: Reason) -> ParseResult<T> {
        let failure = Failure {
            reason,
            position: self.position(),
            offset: self.offset(),
        };
        if self.quiet == 0 {
            let replace = match &self.furthest {
                None => true,
                Some(best) => {
                    failure.position > best.position
                        || (failure.position == best.position
                            && matches!(failure.reason, Reason::NotImplemented(_))
                            && !matches!(best.reason, Reason::NotImplemented(_)))
                }
            };
            if replace {
                self.furthest = Some(failure.clone());
            }
        }
        ParseResult::Failure(failure)
    }

    /// The deepest failure seen since the cursor was created or last
    /// [`clear_furthest`](Self::clear_furthest) call.
    ///
    /// A failed parse usually reports a shallower failure than this one,
    /// because optional parts absorb the failures that ended them.
    pub fn furthest_failure(&self) -> Option<&Failure> {
        self.furthest.as_ref()
    }

    pub fn clear_furthest(&mut self) {
        self.furthest = None;
    }

    /// Run `f` without recording failures as diagnostics.
    pub(crate) fn quietly<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.quiet += 1;
        let result = f(self);
        self.quiet -= 1;
        result
    }

    pub(crate) fn memo_key(&self, rule: usize) -> MemoKey {
        MemoKey {
            rule,
            pos: self.pos,
            newlines: self.newlines,
            quiet: self.quiet > 0,
        }
    }

    /// A stored result for `key`. A stored success moves the cursor to
    /// where that success ended.
    pub(crate) fn recall<T: Clone + 'static>(&mut self, key: &MemoKey) -> Option<ParseResult<T>> {
        let result = self
            .memo
            .get(key)
            .and_then(|stored| stored.downcast_ref::<ParseResult<T>>())
            .cloned()?;
        if let ParseResult::Success { position, .. } = &result {
            self.pos = position.0;
        }
        Some(result)
    }

    /// Store `result` under `key`. Fatal failures depend on the recursion
    /// depth and are not stored.
    pub(crate) fn memoize<T: Clone + 'static>(&mut self, key: MemoKey, result: &ParseResult<T>) {
        if result.failure().is_some_and(Failure::is_fatal) {
            return;
        }
        self.memo.insert(key, Box::new(result.clone()));
    }

    /// Number of memoized recursive rule results.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Forget memoized results, e.g. before parsing with another grammar.
    pub fn clear_memo(&mut self) {
        self.memo.clear();
    }

    /// Current number of active recursive invocations.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Enter one recursion level; `false` when the limit is reached.
    pub(crate) fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn exit(&mut self) {
        debug_assert!(self.depth > 0, "unbalanced recursion exit");
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn is_tracing(&self) -> bool {
        self.trace.is_some()
    }

    pub(crate) fn record(&mut self, event: TraceEvent) {
        if let Some(log) = &mut self.trace {
            log.push(event);
        }
    }

    /// Drain the trace log. Empty unless built with
    /// [`with_trace_log`](Self::with_trace_log).
    pub fn take_trace(&mut self) -> Vec<TraceEvent> {
        self.trace.as_mut().map(std::mem::take).unwrap_or_default()
    }

    #[inline]
    fn last_index(&self) -> usize {
        self.source.len().saturating_sub(1)
    }
}
