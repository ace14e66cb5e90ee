// crates/session-check-cli/src/report.rs
// ============================================================================
// Module: Validation Report Rendering
// Description: Text and JSON renderings of a validation log.
// Purpose: Keep the CLI output format and exit policy in one place.
// Dependencies: serde_json, session-check-core
// ============================================================================

//! ## Overview
//! Text reports print one `level: path: message` line per diagnostic followed
//! by a summary line. JSON reports print the serialized diagnostic list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use session_check_core::ValidationLog;

use crate::t;

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Whether a validated document passes under the configured policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No errors, and no warnings when warnings fail the run.
    Passed,
    /// The document is rejected.
    Failed,
}

/// Classifies a log; warnings count only when `fail_on_warnings` is set.
#[must_use]
pub fn outcome(log: &ValidationLog, fail_on_warnings: bool) -> Outcome {
    if log.has_errors() || (fail_on_warnings && log.has_warnings()) {
        Outcome::Failed
    } else {
        Outcome::Passed
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the text report lines, summary last.
#[must_use]
pub fn render_text(log: &ValidationLog) -> Vec<String> {
    let mut lines: Vec<String> = log.iter().map(ToString::to_string).collect();
    lines.push(t!("report.summary", errors = log.error_count(), warnings = log.warning_count()));
    lines
}

/// Renders the JSON report.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn render_json(log: &ValidationLog) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(log)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use session_check_core::Severity;

    use super::*;

    fn warning_only() -> ValidationLog {
        let mut log = ValidationLog::new();
        log.add(vec!["settings".into()], "Unknown Fields: ['colour']", Severity::Warning);
        log
    }

    #[test]
    fn warnings_pass_unless_configured_to_fail() {
        let log = warning_only();
        assert_eq!(outcome(&log, false), Outcome::Passed);
        assert_eq!(outcome(&log, true), Outcome::Failed);
    }

    #[test]
    fn errors_always_fail() {
        let mut log = ValidationLog::new();
        log.add(Vec::new(), "bad", Severity::Error);
        assert_eq!(outcome(&log, false), Outcome::Failed);
    }

    #[test]
    fn empty_log_passes() {
        assert_eq!(outcome(&ValidationLog::new(), true), Outcome::Passed);
    }

    #[test]
    fn text_report_ends_with_summary() {
        let lines = render_text(&warning_only());
        assert_eq!(
            lines,
            ["warning: settings: Unknown Fields: ['colour']", "0 error(s), 1 warning(s)"]
        );
    }

    #[test]
    fn json_report_is_the_diagnostic_list() {
        let rendered = render_json(&warning_only()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "path": ["settings"],
                "message": "Unknown Fields: ['colour']",
                "level": "warning"
            }])
        );
    }
}
