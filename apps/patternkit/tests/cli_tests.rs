//! End-to-end tests for the `patternkit` binary.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Write `contents` to `name` inside `dir`.
fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Run the binary inside `dir`.
fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_patternkit"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

const NUMBER_RECORD: &str = r##"{"x": {"#tag": "match:kind", "payload": "number"}}"##;

// =============================================================================
// CHECK
// =============================================================================

#[test]
fn test_check_accepts_matching_specimen() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pattern.json", NUMBER_RECORD);
    write(&dir, "specimen.json", r##"{"x": 1}"##);

    let output = run(dir.path(), &["check", "--pattern", "pattern.json", "--specimen", "specimen.json"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "ok");
}

#[test]
fn test_check_reports_labeled_diagnostic() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pattern.json", NUMBER_RECORD);
    write(&dir, "specimen.json", r##"{"x": "one"}"##);

    let output = run(
        dir.path(),
        &["check", "-p", "pattern.json", "-s", "specimen.json", "--label", "input"],
    );
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "input: x: string \"one\" - Must be a number");
}

#[test]
fn test_check_json_mode() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pattern.json", NUMBER_RECORD);
    write(&dir, "specimen.json", r##"{"x": null}"##);

    let output = run(
        dir.path(),
        &["--json-mode", "check", "-p", "pattern.json", "-s", "specimen.json"],
    );
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["matches"], false);
    assert_eq!(json["diagnostic"], "x: null null - Must be a number");
}

#[test]
fn test_check_rejects_invalid_pattern() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pattern.json", r##"{"#tag": "match:lte", "payload": {"#promise": null}}"##);
    write(&dir, "specimen.json", "1");

    let output = run(dir.path(), &["check", "-p", "pattern.json", "-s", "specimen.json"]);
    assert_eq!(output.status.code(), Some(2));
}

// =============================================================================
// LINT / COVER / KIND
// =============================================================================

#[test]
fn test_lint_distinguishes_keys() {
    let dir = TempDir::new().unwrap();
    write(&dir, "key.json", r##"{"a": [1, 2]}"##);
    write(&dir, "pattern.json", NUMBER_RECORD);
    write(&dir, "bad.json", r##"[{"#promise": null}]"##);

    assert_eq!(stdout(&run(dir.path(), &["lint", "-p", "key.json"])), "valid pattern (key)");
    assert_eq!(stdout(&run(dir.path(), &["lint", "-p", "pattern.json"])), "valid pattern");
    let bad = run(dir.path(), &["lint", "-p", "bad.json"]);
    assert_eq!(bad.status.code(), Some(1));
}

#[test]
fn test_cover_of_string_kind() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pattern.json", r##"{"#tag": "match:kind", "payload": "string"}"##);

    let output = run(dir.path(), &["cover", "-p", "pattern.json"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), r##"["s", "t")"##);
}

#[test]
fn test_kind_classifies_values() {
    let dir = TempDir::new().unwrap();
    write(&dir, "set.json", r##"{"#set": ["a", "b"]}"##);
    write(&dir, "bigint.json", r##"{"#bigint": "7"}"##);

    assert_eq!(stdout(&run(dir.path(), &["kind", "--value", "set.json"])), "copySet");
    assert_eq!(stdout(&run(dir.path(), &["kind", "--value", "bigint.json"])), "bigint");
}

// =============================================================================
// CONFIGURATION
// =============================================================================

#[test]
fn test_config_limits_apply() {
    let dir = TempDir::new().unwrap();
    write(&dir, "patternkit.toml", "[kit.limits]\nstringLengthLimit = 3\n");
    write(&dir, "pattern.json", r##"{"#tag": "match:string", "payload": []}"##);
    write(&dir, "short.json", r##""abc""##);
    write(&dir, "long.json", r##""abcd""##);

    let short = run(dir.path(), &["check", "-p", "pattern.json", "-s", "short.json"]);
    assert!(short.status.success());
    let long = run(dir.path(), &["check", "-p", "pattern.json", "-s", "long.json"]);
    assert_eq!(long.status.code(), Some(1));
    assert_eq!(stdout(&long), "string \"abcd\" must not be bigger than 3");
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pattern.json", "1");

    let output = run(dir.path(), &["--config", "absent.toml", "lint", "-p", "pattern.json"]);
    assert_eq!(output.status.code(), Some(2));
}
