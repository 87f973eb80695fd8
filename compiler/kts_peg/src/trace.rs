//! Rule tracing.
//!
//! [`traced`] decorates a rule with a `tracing` span plus a TRACE event
//! (target `kts_peg::trace`) per invocation, and appends a [`TraceEvent`]
//! to the cursor's log when it has one. Disabled tracing returns the rule
//! itself, so an untraced grammar pays nothing.

use std::fmt;

use crate::{ParseResult, Rule, TokenSource};

/// One traced rule invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceEvent {
    pub rule: &'static str,
    /// Recursion depth at entry.
    pub depth: usize,
    /// Byte offset of the token the rule started at.
    pub offset: u32,
    pub outcome: TraceOutcome,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceOutcome {
    /// Matched; `end` is the offset of the next unconsumed token.
    Matched { end: u32 },
    Failed,
}

impl fmt::Display for TraceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceOutcome::Matched { end } => write!(f, "matched to {end}"),
            TraceOutcome::Failed => f.write_str("failed"),
        }
    }
}

/// Wrap `rule` so its invocations are traced under `name`.
pub fn traced<S: TokenSource + 'static, T: 'static>(
    name: &'static str,
    rule: Rule<S, T>,
    enabled: bool,
) -> Rule<S, T> {
    if !enabled {
        return rule;
    }
    Rule::new(move |cursor| {
        let offset = cursor.offset();
        let depth = cursor.depth();
        let _span =
            tracing::trace_span!(target: "kts_peg::trace", "rule", rule = name, offset).entered();

        let result = rule.parse(cursor);

        let outcome = match &result {
            ParseResult::Success { .. } => TraceOutcome::Matched {
                end: cursor.offset(),
            },
            ParseResult::Failure(_) => TraceOutcome::Failed,
        };
        tracing::trace!(target: "kts_peg::trace", rule = name, depth, offset, %outcome);
        if cursor.is_tracing() {
            cursor.record(TraceEvent {
                rule: name,
                depth,
                offset,
                outcome,
            });
        }
        result
    })
}
