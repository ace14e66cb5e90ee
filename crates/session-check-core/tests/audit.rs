// crates/session-check-core/tests/audit.rs
// ============================================================================
// Module: Audit Sink Tests
// Description: Tests for validation audit events and the file sink.
// Purpose: Ensure run summaries are written as JSON lines.
// Dependencies: session-check-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Exercises [`FileAuditSink`] against a temporary directory.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions are permitted."
)]

use serde_json::Value;
use session_check_core::FileAuditSink;
use session_check_core::NoopAuditSink;
use session_check_core::Severity;
use session_check_core::ValidationAuditEvent;
use session_check_core::ValidationAuditEventParams;
use session_check_core::ValidationAuditSink;
use session_check_core::ValidationLog;
use tempfile::TempDir;

type TestResult = Result<(), String>;

fn event(log: &ValidationLog) -> ValidationAuditEvent {
    ValidationAuditEvent::new(ValidationAuditEventParams {
        log,
        sections: vec!["settings".to_string(), "appBar".to_string()],
        ignored_keys: 1,
    })
}

#[test]
fn event_summarizes_the_log() -> TestResult {
    let mut log = ValidationLog::new();
    log.add(vec!["settings".into()], "bad", Severity::Error);
    log.add(vec!["appBar".into()], "odd", Severity::Warning);
    log.add(vec!["appBar".into()], "odd", Severity::Warning);
    let event = event(&log);
    if event.event != "session_validated" || event.error_count != 1 || event.warning_count != 2 {
        return Err(format!("unexpected event {event:?}"));
    }
    if event.timestamp_ms == 0 {
        return Err("timestamp must be set".to_string());
    }
    Ok(())
}

#[test]
fn file_sink_appends_json_lines() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("audit.jsonl");
    let sink = FileAuditSink::new(&path).map_err(|err| err.to_string())?;
    let log = ValidationLog::new();
    sink.record(&event(&log));
    sink.record(&event(&log));

    let contents = std::fs::read_to_string(&path).map_err(|err| err.to_string())?;
    let lines: Vec<&str> = contents.lines().collect();
    if lines.len() != 2 {
        return Err(format!("expected two lines, got {}", lines.len()));
    }
    for line in lines {
        let payload: Value = serde_json::from_str(line).map_err(|err| err.to_string())?;
        if payload["event"] != "session_validated" || payload["ignored_keys"] != 1 {
            return Err(format!("unexpected payload {payload}"));
        }
        if payload["sections"] != serde_json::json!(["settings", "appBar"]) {
            return Err(format!("unexpected sections {}", payload["sections"]));
        }
    }
    Ok(())
}

#[test]
fn file_sink_keeps_existing_lines() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("audit.jsonl");
    std::fs::write(&path, "{\"event\":\"earlier\"}\n").map_err(|err| err.to_string())?;
    let sink = FileAuditSink::new(&path).map_err(|err| err.to_string())?;
    sink.record(&event(&ValidationLog::new()));
    let contents = std::fs::read_to_string(&path).map_err(|err| err.to_string())?;
    if contents.lines().count() != 2 || !contents.starts_with("{\"event\":\"earlier\"}") {
        return Err(format!("unexpected contents {contents}"));
    }
    Ok(())
}

#[test]
fn file_sink_fails_for_missing_directories() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("missing").join("audit.jsonl");
    if FileAuditSink::new(&path).is_ok() {
        return Err("opening under a missing directory must fail".to_string());
    }
    Ok(())
}

#[test]
fn noop_sink_accepts_events() {
    NoopAuditSink.record(&event(&ValidationLog::new()));
}
