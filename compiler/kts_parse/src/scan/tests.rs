use super::*;
use kts_lexer::LexErrorKind;
use pretty_assertions::assert_eq;

fn grammar() -> &'static AnnotationGrammar {
    AnnotationGrammar::shared()
}

#[test]
fn test_scan_annotation_reports_span_and_end() {
    assert_eq!(
        scan_annotation(grammar(), "@Suppress(\"x\")  fun main() {}"),
        Ok(ScanOutcome::Matched {
            span: Span::new(0, 14),
            end: 16,
        })
    );
}

#[test]
fn test_scan_annotation_at_offset() {
    let source = "val x = 1\n@Foo(1) fun f() {}";
    assert_eq!(
        scan_annotation_at(grammar(), source, 10),
        Ok(ScanOutcome::Matched {
            span: Span::new(10, 17),
            end: 18,
        })
    );
    // An offset inside trivia starts at the next token.
    assert_eq!(
        scan_annotation_at(grammar(), source, 9),
        scan_annotation_at(grammar(), source, 10)
    );
}

#[test]
fn test_rejection_at_end_of_input() {
    assert_eq!(
        scan_annotation(grammar(), "  "),
        Ok(ScanOutcome::Rejected {
            reason: Reason::Expected("`@`".into()),
            offset: 2,
        })
    );
}

#[test]
fn test_file_annotation_consumes_exactly_itself() {
    assert_eq!(
        scan_file_annotation(grammar(), "@file:JvmName(\"Foo\")"),
        Ok(ScanOutcome::Matched {
            span: Span::new(0, 20),
            end: 20,
        })
    );
    assert_eq!(
        scan_file_annotation(grammar(), "@file:JvmName(\"Foo\")\npackage foo"),
        Ok(ScanOutcome::Matched {
            span: Span::new(0, 20),
            end: 21,
        })
    );
}

#[test]
fn test_file_annotation_list() {
    let source = "@file:[JvmName(\"Foo\") Suppress(\"x\")] val y";
    let outcome = scan_file_annotation(grammar(), source);
    assert_eq!(
        outcome,
        Ok(ScanOutcome::Matched {
            span: Span::new(0, 36),
            end: 37,
        })
    );
}

#[test]
fn test_file_annotation_requires_file_target() {
    let outcome = scan_file_annotation(grammar(), "@Suppress(\"x\")");
    assert_eq!(
        outcome.map(|outcome| match outcome {
            ScanOutcome::Rejected { reason, offset } => (reason.to_string(), offset),
            ScanOutcome::Matched { .. } => (String::new(), 0),
        }),
        Ok(("expected `file`".to_owned(), 1))
    );
}

#[test]
fn test_skip_file_annotations() {
    let source = "@file:JvmName(\"Foo\")\n@file:Suppress(\"unused\")\n\nplugins { java }";
    assert_eq!(
        skip_file_annotations(grammar(), source),
        Ok(FilePreamble {
            annotations: vec![Span::new(0, 20), Span::new(21, 45)],
            body_offset: 47,
        })
    );
}

#[test]
fn test_skip_without_file_annotations() {
    assert_eq!(
        skip_file_annotations(grammar(), "plugins {}"),
        Ok(FilePreamble {
            annotations: Vec::new(),
            body_offset: 0,
        })
    );
    // A plain annotation is part of the body.
    assert_eq!(
        skip_file_annotations(grammar(), "@Suppress(\"x\")\nval a = 1"),
        Ok(FilePreamble {
            annotations: Vec::new(),
            body_offset: 0,
        })
    );
    // Malformed body text is not the preamble's concern.
    assert_eq!(
        skip_file_annotations(grammar(), "@file:A\n| oops"),
        Ok(FilePreamble {
            annotations: vec![Span::new(0, 7)],
            body_offset: 8,
        })
    );
}

#[test]
fn test_lex_fault_is_propagated() {
    let error = scan_annotation(grammar(), "@Foo(\"abc\n)");
    assert_eq!(
        error,
        Err(ScanError::Lex(LexError::new(
            LexErrorKind::UnterminatedString,
            Span::new(5, 9)
        )))
    );
    assert_eq!(
        error.map_err(|error| error.to_string()),
        Err("malformed input: unterminated string literal at 5..9".to_owned())
    );
    assert!(matches!(
        scan_annotation(grammar(), "@Foo(|)"),
        Err(ScanError::Lex(LexError {
            kind: LexErrorKind::UnexpectedCharacter,
            ..
        }))
    ));
    assert!(matches!(
        skip_file_annotations(grammar(), "@file:Foo(\"abc\n)"),
        Err(ScanError::Lex(LexError {
            kind: LexErrorKind::UnterminatedString,
            ..
        }))
    ));
}

#[test]
fn test_lex_fault_after_the_annotation_is_ignored() {
    assert_eq!(
        scan_annotation(grammar(), "@Foo |"),
        Ok(ScanOutcome::Matched {
            span: Span::new(0, 4),
            end: 5,
        })
    );
}

#[test]
fn test_consume_annotation_at() {
    let lexed = kts_lexer::lex("fun f(@Foo x: Int)");
    let index = lexed.tokens.index_at_offset(6);
    let result = consume_annotation_at(grammar(), &lexed.tokens, index);
    let (span, position) = match result {
        ParseResult::Success { value, position } => (value, position),
        ParseResult::Failure(failure) => panic!("unexpected failure: {failure}"),
    };
    assert_eq!(span, Span::new(6, 10));
    assert_eq!(lexed.tokens[position.index()].span.start, 11);

    // Not an annotation at the first token.
    assert!(consume_annotation_at(grammar(), &lexed.tokens, 0).is_failure());
}
