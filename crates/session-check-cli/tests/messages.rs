// crates/session-check-cli/tests/messages.rs
// ============================================================================
// Module: CLI Message Catalog Tests
// Description: Exercises the message catalog and placeholder substitution.
// Purpose: Ensure CLI user-facing strings route through stable helpers.
// Dependencies: session-check-cli messages module and the `t!` macro.
// ============================================================================

//! ## Overview
//! Validates the message catalog behavior:
//! - Message arguments capture key/value substitutions.
//! - Translation falls back to keys on misses.
//! - The [`t!`](session_check_cli::t) macro formats placeholders correctly.

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

use session_check_cli::messages::MessageArg;
use session_check_cli::messages::translate;
use session_check_cli::t;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Confirms message arguments capture key/value pairs.
#[test]
fn message_arg_new_captures_key_and_value() {
    let arg = MessageArg::new("path", "/tmp/session.json");
    assert_eq!(arg.key, "path");
    assert_eq!(arg.value, "/tmp/session.json");
}

/// Confirms catalog entries resolve and replace placeholders.
#[test]
fn translate_substitutes_placeholders() {
    let args = vec![MessageArg::new("errors", "2"), MessageArg::new("warnings", "0")];
    assert_eq!(translate("report.summary", args), "2 error(s), 0 warning(s)");
}

/// Confirms missing keys fall back to the key string.
#[test]
fn translate_falls_back_to_key() {
    assert_eq!(translate("missing.key", Vec::new()), "missing.key");
}

/// Confirms the macro formats displayable values.
#[test]
fn macro_formats_arguments() {
    let message = t!("contracts.entry", path = "maps.data.*", name = "maps_data");
    assert_eq!(message, "maps.data.*\tmaps_data");
}
