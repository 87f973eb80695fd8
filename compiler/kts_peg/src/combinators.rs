//! Primitive rule constructors.
//!
//! Structural combinators produce the [`Span`] of the tokens they consumed;
//! the values of their parts are discarded. Every combinator leaves the
//! cursor untouched when it fails.
//!
//! | Combinator | Fails when | Consumes on success |
//! |------------|------------|---------------------|
//! | [`token`] | kind differs | one token |
//! | [`symbol`] / [`soft_keyword`] | not an identifier / wrong text | one token |
//! | [`sequence`] | any part fails | all parts |
//! | [`choice`] | every alternative fails | first matching alternative |
//! | [`optional`] | never (except fatal failures) | the part, or nothing |
//! | [`zero_or_more`] | never (except fatal failures) | as many repetitions as match |
//! | [`one_or_more`] | the first repetition fails | as many repetitions as match |
//! | [`followed_by`] | the part does not match | nothing |
//! | [`not_ahead`] | the part matches | nothing |
//! | [`line_break`] | no significant line break before the current token | nothing |
//! | [`ignore_newlines`] / [`respect_newlines`] | the part fails | the part |
//! | [`not_implemented`] | always | - |

use std::sync::Arc;

use kts_ir::Span;

use crate::result::{Failure, Reason};
use crate::{Cursor, ParseResult, Rule, TokenSource};

/// Exactly one token of `kind`.
pub fn token<S: TokenSource + 'static>(kind: S::Kind) -> Rule<S, Span> {
    let expected: Arc<str> = S::describe(kind).into();
    Rule::new(move |cursor| {
        if cursor.current_kind() == kind {
            let span = cursor.advance();
            ParseResult::success(span, cursor.position())
        } else {
            cursor.fail(Reason::Expected(Arc::clone(&expected)))
        }
    })
}

/// Any identifier token.
pub fn symbol<S: TokenSource + 'static>() -> Rule<S, Span> {
    let expected: Arc<str> = Arc::from("identifier");
    Rule::new(move |cursor| {
        if cursor.current_is_identifier() {
            let span = cursor.advance();
            ParseResult::success(span, cursor.position())
        } else {
            cursor.fail(Reason::Expected(Arc::clone(&expected)))
        }
    })
}

/// An identifier token spelled exactly `text`.
pub fn soft_keyword<S: TokenSource + 'static>(text: &str) -> Rule<S, Span> {
    let text: Arc<str> = Arc::from(text);
    let expected: Arc<str> = format!("`{text}`").into();
    Rule::new(move |cursor| {
        if cursor.current_is_identifier() && cursor.current_text() == &*text {
            let span = cursor.advance();
            ParseResult::success(span, cursor.position())
        } else {
            cursor.fail(Reason::Expected(Arc::clone(&expected)))
        }
    })
}

/// All `parts` in order, each starting where the previous one ended.
pub fn sequence<S: TokenSource + 'static, T: 'static>(parts: &[&Rule<S, T>]) -> Rule<S, Span> {
    let parts: Vec<Rule<S, T>> = parts.iter().map(|&part| part.clone()).collect();
    Rule::new(move |cursor| {
        let start = cursor.position();
        for part in &parts {
            if let ParseResult::Failure(failure) = part.parse(cursor) {
                cursor.restore(start);
                return ParseResult::Failure(failure);
            }
        }
        ParseResult::success(cursor.span_since(start), cursor.position())
    })
}

/// Ordered choice: the first alternative that matches wins.
///
/// When every alternative fails, the failure detected at the deepest token
/// position is reported; ties go to the earliest alternative.
pub fn choice<S: TokenSource + 'static, T: 'static>(alternatives: &[&Rule<S, T>]) -> Rule<S, T> {
    let alternatives: Vec<Rule<S, T>> = alternatives.iter().map(|&alt| alt.clone()).collect();
    Rule::new(move |cursor| {
        let mut deepest: Option<Failure> = None;
        for alternative in &alternatives {
            match alternative.parse(cursor) {
                success @ ParseResult::Success { .. } => return success,
                ParseResult::Failure(failure) if failure.is_fatal() => {
                    return ParseResult::Failure(failure);
                }
                ParseResult::Failure(failure) => {
                    let deeper = match &deepest {
                        Some(best) => failure.position > best.position,
                        None => true,
                    };
                    if deeper {
                        deepest = Some(failure);
                    }
                }
            }
        }
        match deepest {
            Some(failure) => ParseResult::Failure(failure),
            None => cursor.fail(Reason::Expected(Arc::from("an alternative"))),
        }
    })
}

/// `part` if it matches, otherwise nothing.
pub fn optional<S: TokenSource + 'static, T: 'static>(part: &Rule<S, T>) -> Rule<S, Span> {
    let part = part.clone();
    Rule::new(move |cursor| {
        let start = cursor.position();
        match part.parse(cursor) {
            ParseResult::Failure(failure) if failure.is_fatal() => ParseResult::Failure(failure),
            _ => ParseResult::success(cursor.span_since(start), cursor.position()),
        }
    })
}

/// Greedy repetition; always succeeds.
pub fn zero_or_more<S: TokenSource + 'static, T: 'static>(part: &Rule<S, T>) -> Rule<S, Span> {
    let part = part.clone();
    Rule::new(move |cursor| {
        let start = cursor.position();
        match repeat(&part, cursor) {
            Some(failure) => {
                cursor.restore(start);
                ParseResult::Failure(failure)
            }
            None => ParseResult::success(cursor.span_since(start), cursor.position()),
        }
    })
}

/// Greedy repetition of at least one match.
pub fn one_or_more<S: TokenSource + 'static, T: 'static>(part: &Rule<S, T>) -> Rule<S, Span> {
    let part = part.clone();
    Rule::new(move |cursor| {
        let start = cursor.position();
        if let ParseResult::Failure(failure) = part.parse(cursor) {
            return ParseResult::Failure(failure);
        }
        match repeat(&part, cursor) {
            Some(failure) => {
                cursor.restore(start);
                ParseResult::Failure(failure)
            }
            None => ParseResult::success(cursor.span_since(start), cursor.position()),
        }
    })
}

/// Apply `part` until it fails or stops making progress.
///
/// Returns the failure only if it is fatal.
fn repeat<S: TokenSource + 'static, T: 'static>(
    part: &Rule<S, T>,
    cursor: &mut Cursor<'_, S>,
) -> Option<Failure> {
    loop {
        let before = cursor.position();
        match part.parse(cursor) {
            ParseResult::Success { .. } if cursor.position() == before => return None,
            ParseResult::Success { .. } => {}
            ParseResult::Failure(failure) if failure.is_fatal() => return Some(failure),
            ParseResult::Failure(_) => return None,
        }
    }
}

/// `open`, `content`, `close` in sequence.
pub fn wrapped<S: TokenSource + 'static, T: 'static>(
    open: &Rule<S, Span>,
    content: &Rule<S, T>,
    close: &Rule<S, Span>,
) -> Rule<S, Span> {
    let content = content.map(|_| Span::default());
    sequence(&[open, &content, close])
}

/// Positive lookahead: a zero-width match where `part` matches.
pub fn followed_by<S: TokenSource + 'static, T: 'static>(part: &Rule<S, T>) -> Rule<S, Span> {
    let part = part.clone();
    Rule::new(move |cursor| {
        let start = cursor.position();
        match part.parse(cursor) {
            ParseResult::Success { .. } => {
                cursor.restore(start);
                ParseResult::success(Span::point(cursor.offset()), start)
            }
            ParseResult::Failure(failure) => ParseResult::Failure(failure),
        }
    })
}

/// Negative lookahead: a zero-width match where `part` does not match.
///
/// Failures of `part` are expected here and are not recorded as the
/// cursor's furthest failure.
pub fn not_ahead<S: TokenSource + 'static, T: 'static>(part: &Rule<S, T>) -> Rule<S, Span> {
    let part = part.clone();
    Rule::new(move |cursor| {
        let start = cursor.position();
        match cursor.quietly(|cursor| part.parse(cursor)) {
            ParseResult::Failure(failure) if failure.is_fatal() => ParseResult::Failure(failure),
            ParseResult::Failure(_) => ParseResult::success(Span::point(cursor.offset()), start),
            ParseResult::Success { .. } => {
                cursor.restore(start);
                let found = S::describe(cursor.current_kind());
                cursor.fail(Reason::Unexpected(found.into()))
            }
        }
    })
}

/// Zero-width match before a token that starts a new line.
///
/// Never matches inside [`ignore_newlines`].
pub fn line_break<S: TokenSource + 'static>() -> Rule<S, Span> {
    let expected: Arc<str> = Arc::from("line break");
    Rule::new(move |cursor| {
        if cursor.newlines_significant() && cursor.newline_before_current() {
            ParseResult::success(Span::point(cursor.offset()), cursor.position())
        } else {
            cursor.fail(Reason::Expected(Arc::clone(&expected)))
        }
    })
}

/// `part` with line breaks treated as plain whitespace, as inside
/// parentheses.
pub fn ignore_newlines<S: TokenSource + 'static, T: 'static>(part: &Rule<S, T>) -> Rule<S, T> {
    let part = part.clone();
    Rule::new(move |cursor| cursor.with_newlines(false, |cursor| part.parse(cursor)))
}

/// `part` with line breaks significant again, as inside a block nested in
/// [`ignore_newlines`].
pub fn respect_newlines<S: TokenSource + 'static, T: 'static>(part: &Rule<S, T>) -> Rule<S, T> {
    let part = part.clone();
    Rule::new(move |cursor| cursor.with_newlines(true, |cursor| part.parse(cursor)))
}

/// A production that always fails with `"<name> not implemented"`.
pub fn not_implemented<S: TokenSource + 'static, T: 'static>(name: &'static str) -> Rule<S, T> {
    Rule::new(move |cursor| cursor.fail(Reason::NotImplemented(name)))
}
