//! Parse results.
//!
//! Failure is a value, never a panic. A failed rule leaves the cursor where
//! it was before the attempt; the [`Failure`] records where the mismatch was
//! detected, which may be deeper than where the attempt started.

use std::fmt;
use std::sync::Arc;

use crate::Position;

/// Outcome of applying a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseResult<T> {
    /// The rule matched; `position` is where the cursor ended up.
    Success { value: T, position: Position },
    Failure(Failure),
}

impl<T> ParseResult<T> {
    #[inline]
    pub fn success(value: T, position: Position) -> Self {
        ParseResult::Success { value, position }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, ParseResult::Success { .. })
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Map the success value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseResult<U> {
        match self {
            ParseResult::Success { value, position } => ParseResult::Success {
                value: f(value),
                position,
            },
            ParseResult::Failure(failure) => ParseResult::Failure(failure),
        }
    }

    /// The failure, if any.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            ParseResult::Success { .. } => None,
            ParseResult::Failure(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<(T, Position), Failure> {
        match self {
            ParseResult::Success { value, position } => Ok((value, position)),
            ParseResult::Failure(failure) => Err(failure),
        }
    }
}

/// Why and where a rule failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{reason} at byte {offset}")]
pub struct Failure {
    pub reason: Reason,
    /// Token position at which the failure was detected.
    pub position: Position,
    /// Byte offset of the token at `position`.
    pub offset: u32,
}

impl Failure {
    /// Fatal failures abort enclosing alternatives and repetitions instead
    /// of being absorbed by them.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self.reason, Reason::DepthLimit { .. })
    }
}

/// Failure reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reason {
    /// A token or construct was expected but not found.
    Expected(Arc<str>),
    /// A token or construct was found where it must not appear.
    Unexpected(Arc<str>),
    /// A production that is deliberately not recognized.
    NotImplemented(&'static str),
    /// Recursive rules nested deeper than the cursor allows.
    DepthLimit { limit: usize },
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Expected(what) => write!(f, "expected {what}"),
            Reason::Unexpected(what) => write!(f, "unexpected {what}"),
            Reason::NotImplemented(rule) => write!(f, "{rule} not implemented"),
            Reason::DepthLimit { limit } => write!(f, "nesting deeper than {limit} levels"),
        }
    }
}
