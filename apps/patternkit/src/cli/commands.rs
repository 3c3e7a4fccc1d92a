//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::Outcome;
use patternkit::CliError;
use patternkit::notation;
use patternkit_core::{Checker, PatternKit, RankEncoder, is_key};
use std::path::Path;

/// Print a JSON document on stdout.
fn print_json(output: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(output).unwrap_or_default());
}

/// Read a pattern file and assert that it holds a pattern.
fn load_pattern(kit: &PatternKit, path: &Path) -> Result<patternkit_core::Pattern, CliError> {
    let pattern = notation::read_file(path)?;
    kit.assert_pattern(&pattern)?;
    Ok(pattern)
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Match a specimen against a pattern.
pub fn cmd_check(
    kit: &PatternKit,
    json_mode: bool,
    pattern: &Path,
    specimen: &Path,
    label: Option<&str>,
) -> Result<Outcome, CliError> {
    tracing::info!("Checking {:?} against {:?}", specimen, pattern);

    let pattern = load_pattern(kit, pattern)?;
    let specimen = notation::read_file(specimen)?;
    let result = kit.must_match(&specimen, &pattern, label);

    if json_mode {
        print_json(&serde_json::json!({
            "matches": result.is_ok(),
            "diagnostic": result.as_ref().err().map(|e| e.message()),
        }));
    } else {
        match &result {
            Ok(()) => println!("ok"),
            Err(e) => println!("{}", e.message()),
        }
    }

    Ok(if result.is_ok() { Outcome::Accepted } else { Outcome::Rejected })
}

// =============================================================================
// LINT COMMAND
// =============================================================================

/// Report whether a value is a valid pattern.
pub fn cmd_lint(kit: &PatternKit, json_mode: bool, pattern: &Path) -> Result<Outcome, CliError> {
    tracing::info!("Linting {:?}", pattern);

    let value = notation::read_file(pattern)?;
    let result = kit.assert_pattern(&value);
    let key = result.is_ok() && is_key(&value);

    if json_mode {
        print_json(&serde_json::json!({
            "pattern": result.is_ok(),
            "key": key,
            "diagnostic": result.as_ref().err().map(|e| e.message()),
        }));
    } else {
        match &result {
            Ok(()) if key => println!("valid pattern (key)"),
            Ok(()) => println!("valid pattern"),
            Err(e) => println!("{}", e.message()),
        }
    }

    Ok(if result.is_ok() { Outcome::Accepted } else { Outcome::Rejected })
}

// =============================================================================
// COVER COMMAND
// =============================================================================

/// Print the rank cover of a pattern under the rank encoder.
pub fn cmd_cover(kit: &PatternKit, json_mode: bool, pattern: &Path) -> Result<Outcome, CliError> {
    let pattern = load_pattern(kit, pattern)?;
    let cover = kit.get_rank_cover(&pattern, &RankEncoder);

    if json_mode {
        print_json(&serde_json::json!({
            "lower": cover.lower,
            "upper": cover.upper,
        }));
    } else {
        println!("[{:?}, {:?})", cover.lower, cover.upper);
    }

    Ok(Outcome::Accepted)
}

// =============================================================================
// KIND COMMAND
// =============================================================================

/// Print the kind of a value.
pub fn cmd_kind(kit: &PatternKit, json_mode: bool, value: &Path) -> Result<Outcome, CliError> {
    let value = notation::read_file(value)?;
    let result = kit.kind_of(&value, Checker::Assert);

    if json_mode {
        print_json(&serde_json::json!({
            "kind": result.as_ref().ok().map(|k| k.name()),
            "diagnostic": result.as_ref().err().and_then(|m| m.message()),
        }));
    } else {
        match &result {
            Ok(kind) => println!("{}", kind),
            Err(mismatch) => println!("{}", mismatch.message().unwrap_or("no kind")),
        }
    }

    Ok(if result.is_ok() { Outcome::Accepted } else { Outcome::Rejected })
}
