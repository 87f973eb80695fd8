//! Recognizer for Kotlin annotations.
//!
//! Decides whether an annotation starts at a given token and where it ends,
//! without building a syntax tree. Typical use is skipping the annotations
//! in front of a Kotlin script body:
//!
//! - [`AnnotationGrammar`]: the grammar, built once and shared.
//! - [`AnnotationGrammar::parse_annotation`] /
//!   [`AnnotationGrammar::parse_file_annotation`]: token-level entry points.
//! - [`scan_annotation`], [`scan_file_annotation`],
//!   [`skip_file_annotations`]: source-level helpers that lex first.
//! - [`ParseConfig`]: depth limit and rule tracing, optionally from the
//!   environment.

mod config;
mod grammar;
mod scan;

use std::fmt;
use std::sync::OnceLock;

use tracing::debug;

use kts_ir::{Span, TokenList};

pub use config::{ConfigError, ParseConfig, MAX_DEPTH_VAR, TRACE_RULES_VAR};
pub use kts_peg::{Cursor, Failure, ParseResult, Position, Reason};
pub use scan::{
    consume_annotation_at, scan_annotation, scan_annotation_at, scan_file_annotation,
    skip_file_annotations, FilePreamble, ScanError, ScanOutcome,
};

use grammar::KtRule;

/// The annotation grammar: immutable, `Send + Sync`, reusable for any
/// number of parses.
pub struct AnnotationGrammar {
    annotation: KtRule,
    file_annotation: KtRule,
    config: ParseConfig,
    /// Keeps the recursive rules alive.
    _definitions: kts_peg::Definitions,
}

impl AnnotationGrammar {
    /// Build with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&ParseConfig::default())
    }

    pub fn with_config(config: &ParseConfig) -> Self {
        let rules = grammar::build(config.trace_rules);
        AnnotationGrammar {
            annotation: rules.annotation,
            file_annotation: rules.file_annotation,
            config: *config,
            _definitions: rules.definitions,
        }
    }

    /// Process-wide grammar with the default configuration, built on first
    /// use.
    pub fn shared() -> &'static AnnotationGrammar {
        static SHARED: OnceLock<AnnotationGrammar> = OnceLock::new();
        SHARED.get_or_init(AnnotationGrammar::new)
    }

    #[inline]
    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// A cursor over `tokens` honoring this grammar's depth limit.
    pub fn cursor<'a>(&self, tokens: &'a TokenList) -> Cursor<'a, TokenList> {
        self.config.cursor(tokens)
    }

    /// Recognize one annotation (`@Foo(...)`, `@get:Foo`, `@[Foo Bar]`) at
    /// the cursor.
    ///
    /// On success the cursor sits on the first token after the annotation,
    /// so [`Cursor::offset`] is the end of the consumed text including
    /// trailing trivia. On failure the cursor is unchanged and the failure
    /// is the deepest one seen during the attempt.
    pub fn parse_annotation(&self, cursor: &mut Cursor<'_, TokenList>) -> ParseResult<Span> {
        run("parseAnnotation", &self.annotation, cursor)
    }

    /// Recognize one `@file:` annotation at the cursor.
    pub fn parse_file_annotation(&self, cursor: &mut Cursor<'_, TokenList>) -> ParseResult<Span> {
        run("parseFileAnnotation", &self.file_annotation, cursor)
    }
}

impl Default for AnnotationGrammar {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AnnotationGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationGrammar")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn run(
    entry: &'static str,
    rule: &KtRule,
    cursor: &mut Cursor<'_, TokenList>,
) -> ParseResult<Span> {
    cursor.clear_furthest();
    cursor.clear_memo();
    let start = cursor.offset();
    debug!(entry, start, "parsing");

    match rule.parse(cursor) {
        ParseResult::Success { value, position } => {
            debug!(entry, start, end = cursor.offset(), "matched");
            ParseResult::Success { value, position }
        }
        ParseResult::Failure(failure) => {
            let failure = if failure.is_fatal() {
                failure
            } else {
                cursor.furthest_failure().cloned().unwrap_or(failure)
            };
            debug!(entry, start, at = failure.offset, reason = %failure.reason, "rejected");
            ParseResult::Failure(failure)
        }
    }
}
