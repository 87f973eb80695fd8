//! End-to-end tests for the `ktsc` binary.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn ktsc() -> Command {
    let mut cmd = Command::cargo_bin("ktsc").unwrap();
    cmd.env_remove("KTS_LOG")
        .env_remove("RUST_LOG")
        .env_remove("KTS_MAX_DEPTH")
        .env_remove("KTS_TRACE_RULES");
    cmd
}

#[test]
fn annotation_from_stdin() {
    ktsc()
        .args(["annotation", "-"])
        .write_stdin("@Suppress(\"x\")  fun main() {}")
        .assert()
        .success()
        .stdout(contains("0..14\t@Suppress(\"x\")").and(contains("end 16")));
}

#[test]
fn annotation_at_offset() {
    ktsc()
        .args(["annotation", "-", "--offset", "10"])
        .write_stdin("val x = 1\n@Foo(1) fun f() {}")
        .assert()
        .success()
        .stdout(contains("10..17\t@Foo(1)"));
}

#[test]
fn rejected_annotation_exits_with_one() {
    ktsc()
        .args(["annotation", "-"])
        .write_stdin("@Foo(bar = { val x = 1 })")
        .assert()
        .code(1)
        .stdout(contains("rejected at 13: classDeclaration not implemented"));
}

#[test]
fn malformed_source_exits_with_two() {
    ktsc()
        .args(["annotation", "-"])
        .write_stdin("@Foo(\"abc\n)")
        .assert()
        .code(2)
        .stderr(contains("unterminated string literal at 5..9"));
}

#[test]
fn missing_file_exits_with_two() {
    ktsc()
        .args(["preamble", "does/not/exist.kts"])
        .assert()
        .code(2)
        .stderr(contains("cannot read does/not/exist.kts"));
}

#[test]
fn preamble_lists_file_annotations() {
    ktsc()
        .args(["preamble", "-"])
        .write_stdin("@file:JvmName(\"Foo\")\n@file:Suppress(\"unused\")\n\nplugins { java }")
        .assert()
        .success()
        .stdout(
            contains("0..20\t@file:JvmName(\"Foo\")")
                .and(contains("21..45\t@file:Suppress(\"unused\")"))
                .and(contains("body 47")),
        );
}

#[test]
fn depth_limit_from_flag_and_env() {
    let nested = format!("@Foo({}1{})", "[".repeat(10), "]".repeat(10));
    ktsc()
        .args(["--max-depth", "4", "annotation", "-"])
        .write_stdin(nested.clone())
        .assert()
        .code(1)
        .stdout(contains("nesting deeper than 4 levels"));

    ktsc()
        .env("KTS_MAX_DEPTH", "4")
        .args(["annotation", "-"])
        .write_stdin(nested)
        .assert()
        .code(1)
        .stdout(contains("nesting deeper than 4 levels"));
}

#[test]
fn invalid_configuration_exits_with_two() {
    ktsc()
        .args(["annotation", "-", "--max-depth", "0"])
        .write_stdin("@Foo")
        .assert()
        .code(2)
        .stderr(contains("--max-depth must be a positive integer"));

    ktsc()
        .env("KTS_MAX_DEPTH", "deep")
        .args(["annotation", "-"])
        .write_stdin("@Foo")
        .assert()
        .code(2)
        .stderr(contains("KTS_MAX_DEPTH must be a positive integer, got `deep`"));
}

#[test]
fn trace_rules_prints_rule_tree() {
    ktsc()
        .args(["annotation", "-", "--trace-rules"])
        .write_stdin("@Foo")
        .assert()
        .success()
        .stderr(contains("parseAnnotation").and(contains("singleAnnotation")));
}
