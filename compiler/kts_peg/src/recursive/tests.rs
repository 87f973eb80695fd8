use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::fixture::Chars;
use crate::{choice, optional, sequence, symbol, token, Cursor, Failure, ParseResult};
use kts_ir::Span;
use pretty_assertions::assert_eq;

/// `group = '(' group? ')' | identifier`
fn nested_groups() -> (Rule<Chars, Span>, Definitions) {
    let mut definitions = Definitions::new();
    let group = definitions.declare::<Chars, Span>("group");

    let parens = sequence(&[&token('('), &optional(&group.rule()), &token(')')]);
    let body = choice(&[&parens, &symbol()]);
    let entry = group.rule();
    definitions.define(group, body);
    (entry, definitions)
}

fn parse(rule: &Rule<Chars, Span>, text: &str, max_depth: usize) -> (ParseResult<Span>, u32) {
    let source = Chars::new(text);
    let mut cursor = Cursor::new(&source).with_max_depth(max_depth);
    let result = rule.parse(&mut cursor);
    assert_eq!(cursor.depth(), 0, "recursion depth must unwind");
    (result, cursor.offset())
}

#[test]
fn test_self_recursion() {
    let (group, definitions) = nested_groups();
    assert!(definitions.unresolved().is_empty());
    assert_eq!(definitions.len(), 1);

    let (result, offset) = parse(&group, "((x)) y", 16);
    assert!(result.is_success());
    assert_eq!(offset, 6);

    let (result, offset) = parse(&group, "(()", 16);
    assert!(result.is_failure());
    assert_eq!(offset, 0);
}

#[test]
fn test_depth_limit_is_a_failure() {
    let (group, _definitions) = nested_groups();
    let deep = format!("{}x{}", "(".repeat(10), ")".repeat(10));

    let (result, _) = parse(&group, &deep, 11);
    assert!(result.is_success());

    let (result, offset) = parse(&group, &deep, 10);
    assert_eq!(offset, 0);
    let failure: Option<Failure> = result.failure().cloned();
    assert_eq!(
        failure.map(|f| (f.reason, f.offset)),
        Some((Reason::DepthLimit { limit: 10 }, 10))
    );
}

#[test]
fn test_very_deep_nesting_does_not_overflow() {
    let (group, _definitions) = nested_groups();
    let depth = 20_000;
    let deep = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
    let (result, _) = parse(&group, &deep, depth + 1);
    assert!(result.is_success());
}

#[test]
fn test_unresolved_handles_are_reported() {
    let mut definitions = Definitions::new();
    let defined = definitions.declare::<Chars, Span>("defined");
    let _pending = definitions.declare::<Chars, Span>("pending");
    definitions.define(defined, token('x'));
    assert_eq!(definitions.unresolved(), vec!["pending"]);
}

#[test]
#[should_panic(expected = "recursive rule `later` is not defined")]
fn test_invoking_undefined_rule_panics() {
    let later = Recursive::<Chars, Span>::declare("later");
    let source = Chars::new("x");
    let mut cursor = Cursor::new(&source);
    let _ = later.rule().parse(&mut cursor);
}

#[test]
#[should_panic(expected = "recursive rule `group` is not defined")]
fn test_rules_do_not_outlive_definitions() {
    let (group, definitions) = nested_groups();
    drop(definitions);
    let source = Chars::new("x");
    let mut cursor = Cursor::new(&source);
    let _ = group.parse(&mut cursor);
}

/// `pair = '(' pair ')' '+' | '(' pair ')' '-' | identifier`, counting how
/// often the body runs. Without memoization the second alternative
/// re-parses the nested pair, doubling the work per level.
fn counted_pairs() -> (Rule<Chars, Span>, Definitions, Arc<AtomicUsize>) {
    let mut definitions = Definitions::new();
    let pair = definitions.declare::<Chars, Span>("pair");
    let inner = sequence(&[&token('('), &pair.rule(), &token(')')]);
    let body = choice(&[
        &sequence(&[&inner, &token('+')]),
        &sequence(&[&inner, &token('-')]),
        &symbol(),
    ]);
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let counted = Rule::new(move |cursor| {
        counter.fetch_add(1, Ordering::Relaxed);
        body.parse(cursor)
    });
    let entry = pair.rule();
    definitions.define(pair, counted);
    (entry, definitions, runs)
}

#[test]
fn test_results_are_memoized_per_position() {
    let (pair, _definitions, runs) = counted_pairs();
    let depth = 40;
    let text = format!("{}x{}", "(".repeat(depth), ")-".repeat(depth));
    let source = Chars::new(&text);
    let mut cursor = Cursor::new(&source);
    let start = cursor.position();

    assert!(pair.parse(&mut cursor).is_success());
    assert!(cursor.is_at_end());
    assert_eq!(runs.load(Ordering::Relaxed), depth + 1);
    assert_eq!(cursor.memo_len(), depth + 1);

    // A second parse from the start is answered from the table.
    cursor.restore(start);
    assert!(pair.parse(&mut cursor).is_success());
    assert_eq!(runs.load(Ordering::Relaxed), depth + 1);

    cursor.clear_memo();
    assert_eq!(cursor.memo_len(), 0);
}

#[test]
fn test_memoized_failure_keeps_cursor() {
    let (pair, _definitions, runs) = counted_pairs();
    let source = Chars::new("((x)");
    let mut cursor = Cursor::new(&source);

    assert!(pair.parse(&mut cursor).is_failure());
    let first = runs.load(Ordering::Relaxed);
    assert!(pair.parse(&mut cursor).is_failure());
    assert_eq!(runs.load(Ordering::Relaxed), first);
    assert_eq!(cursor.offset(), 0);
}

#[test]
fn test_depth_limit_failures_are_not_memoized() {
    let (group, _definitions) = nested_groups();
    let source = Chars::new("((x))");
    let mut cursor = Cursor::new(&source).with_max_depth(2);
    assert!(group.parse(&mut cursor).failure().is_some_and(Failure::is_fatal));
    assert_eq!(cursor.memo_len(), 0);
}
