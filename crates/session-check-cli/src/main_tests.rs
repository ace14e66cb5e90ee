// crates/session-check-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for bounded reads and argument mapping.
// Purpose: Ensure bounded reads fail closed on oversized inputs.
// Dependencies: session-check-cli main helpers
// ============================================================================

//! ## Overview
//! Validates `read_bytes_with_limit` and `read_session` against real files.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use clap::Parser;
use session_check_config::OutputFormat;
use tempfile::TempDir;

use super::Cli;
use super::Commands;
use super::FormatArg;
use super::ReadLimitError;
use super::read_bytes_with_limit;
use super::read_session;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn read_bytes_with_limit_accepts_exact_size() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("exact.json");
    fs::write(&path, b"{}").expect("write");
    let bytes = read_bytes_with_limit(&path, 2).expect("read");
    assert_eq!(bytes, b"{}");
}

#[test]
fn read_bytes_with_limit_rejects_oversized_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("large.json");
    fs::write(&path, b"{\"a\": 1}").expect("write");
    match read_bytes_with_limit(&path, 4) {
        Err(ReadLimitError::TooLarge {
            size,
            limit,
        }) => {
            assert_eq!(size, 8);
            assert_eq!(limit, 4);
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn read_bytes_with_limit_reports_missing_file() {
    let dir = TempDir::new().expect("temp dir");
    let result = read_bytes_with_limit(&dir.path().join("absent.json"), 16);
    assert!(matches!(result, Err(ReadLimitError::Io(_))));
}

#[test]
fn read_session_reports_parse_failures() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("broken.json");
    fs::write(&path, b"{\"settings\": ").expect("write");
    let err = read_session(&path, 1024).unwrap_err();
    assert!(err.to_string().starts_with("Failed to parse session document"), "{err}");
}

#[test]
fn format_flag_overrides_config_format() {
    assert_eq!(OutputFormat::from(FormatArg::Json), OutputFormat::Json);
    assert_eq!(OutputFormat::from(FormatArg::Text), OutputFormat::Text);
}

#[test]
fn validate_arguments_parse() {
    let cli = Cli::try_parse_from([
        "session-check",
        "validate",
        "session.json",
        "--ignore-key",
        "order",
        "--ignore-key",
        "timeValues",
        "--format",
        "json",
    ])
    .expect("parse");
    let Some(Commands::Validate(command)) = cli.command else {
        panic!("expected validate command");
    };
    assert_eq!(command.ignore_keys, ["order", "timeValues"]);
    assert_eq!(command.format, Some(FormatArg::Json));
    assert!(command.config.is_none());
}
