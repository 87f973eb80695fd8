//! Source-level scanning: lex, then recognize.
//!
//! These helpers answer "where does the annotation starting here end?" for
//! raw source text. Tokenizer faults are reported, not swallowed: when a
//! parse fails on a malformed token, the result is [`ScanError::Lex`]
//! rather than a grammar mismatch.

use tracing::debug;

use kts_ir::{Span, TokenKind, TokenList};
use kts_lexer::{LexError, Lexed};
use kts_peg::{Failure, ParseResult, Reason};

use crate::AnnotationGrammar;

/// Result of scanning for an annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// `span` covers the annotation's tokens; `end` is the offset of the
    /// next token (or the source length), so trailing trivia is consumed.
    Matched { span: Span, end: u32 },
    /// No annotation here.
    Rejected { reason: Reason, offset: u32 },
}

impl ScanOutcome {
    #[inline]
    pub fn is_matched(&self) -> bool {
        matches!(self, ScanOutcome::Matched { .. })
    }
}

/// A scan that could not be decided.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("malformed input: {0}")]
    Lex(#[from] LexError),
}

/// The `@file:` annotations at the top of a script.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilePreamble {
    pub annotations: Vec<Span>,
    /// Offset of the first token after the annotations.
    pub body_offset: u32,
}

/// Scan for an annotation at the first token of `source`.
pub fn scan_annotation(
    grammar: &AnnotationGrammar,
    source: &str,
) -> Result<ScanOutcome, ScanError> {
    scan_annotation_at(grammar, source, 0)
}

/// Scan for an annotation at the first token starting at or after byte
/// `offset`.
pub fn scan_annotation_at(
    grammar: &AnnotationGrammar,
    source: &str,
    offset: u32,
) -> Result<ScanOutcome, ScanError> {
    let lexed = kts_lexer::lex(source);
    let index = lexed.tokens.index_at_offset(offset);
    let result = consume_annotation_at(grammar, &lexed.tokens, index);
    outcome(&lexed, result)
}

/// Scan for a `@file:` annotation at the first token of `source`.
pub fn scan_file_annotation(
    grammar: &AnnotationGrammar,
    source: &str,
) -> Result<ScanOutcome, ScanError> {
    let lexed = kts_lexer::lex(source);
    let mut cursor = grammar.cursor(&lexed.tokens);
    let result = grammar.parse_file_annotation(&mut cursor);
    outcome(&lexed, result)
}

/// Skip the leading `@file:` annotations of a script.
///
/// Stops at the first token that does not start a file annotation. A
/// malformed token is only an error when an annotation attempt got past
/// its first token before failing on it.
pub fn skip_file_annotations(
    grammar: &AnnotationGrammar,
    source: &str,
) -> Result<FilePreamble, ScanError> {
    let lexed = kts_lexer::lex(source);
    let mut cursor = grammar.cursor(&lexed.tokens);
    let mut annotations = Vec::new();

    loop {
        let start = cursor.position();
        match grammar.parse_file_annotation(&mut cursor) {
            ParseResult::Success { value, .. } => annotations.push(value),
            ParseResult::Failure(failure) => {
                if failure.position > start {
                    lex_fault(&lexed, &failure)?;
                }
                break;
            }
        }
    }

    let body_offset = cursor.offset();
    debug!(count = annotations.len(), body_offset, "skipped file annotations");
    Ok(FilePreamble {
        annotations,
        body_offset,
    })
}

/// Run the annotation rule at token `index` of an already lexed list.
pub fn consume_annotation_at(
    grammar: &AnnotationGrammar,
    tokens: &TokenList,
    index: usize,
) -> ParseResult<Span> {
    let mut cursor = grammar.cursor(tokens).at_index(index);
    grammar.parse_annotation(&mut cursor)
}

fn outcome(lexed: &Lexed, result: ParseResult<Span>) -> Result<ScanOutcome, ScanError> {
    match result {
        ParseResult::Success { value, position } => {
            let end = lexed
                .tokens
                .get(position.index())
                .map_or(value.end, |token| token.span.start);
            Ok(ScanOutcome::Matched { span: value, end })
        }
        ParseResult::Failure(failure) => {
            lex_fault(lexed, &failure)?;
            Ok(ScanOutcome::Rejected {
                reason: failure.reason,
                offset: failure.offset,
            })
        }
    }
}

/// The tokenizer fault behind `failure`, if it failed on an error token.
fn lex_fault(lexed: &Lexed, failure: &Failure) -> Result<(), ScanError> {
    let Some(token) = lexed.tokens.get(failure.position.index()) else {
        return Ok(());
    };
    if token.kind != TokenKind::Error {
        return Ok(());
    }
    match lexed.error_at(token.span.start) {
        Some(error) => Err(ScanError::Lex(*error)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests;
