// crates/session-check-core/src/audit.rs
// ============================================================================
// Module: Validation Audit Logging
// Description: Structured audit events for completed validation runs.
// Purpose: Emit run summaries without hard logging dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! One [`ValidationAuditEvent`] summarizes a validation run. Sink failures
//! are swallowed: recording an event never changes the outcome of the run it
//! describes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::diagnostics::ValidationLog;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Validation audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Number of error-level diagnostics.
    pub error_count: usize,
    /// Number of warning-level diagnostics.
    pub warning_count: usize,
    /// Top-level sections present in the document.
    pub sections: Vec<String>,
    /// Number of field names skipped during the run.
    pub ignored_keys: usize,
}

/// Inputs required to construct an audit event.
pub struct ValidationAuditEventParams<'a> {
    /// Diagnostics produced by the run.
    pub log: &'a ValidationLog,
    /// Top-level sections present in the document.
    pub sections: Vec<String>,
    /// Number of field names skipped during the run.
    pub ignored_keys: usize,
}

impl ValidationAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: ValidationAuditEventParams<'_>) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "session_validated",
            timestamp_ms,
            error_count: params.log.error_count(),
            warning_count: params.log.warning_count(),
            sections: params.sections,
            ignored_keys: params.ignored_keys,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for validation events.
pub trait ValidationAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &ValidationAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ValidationAuditSink for StderrAuditSink {
    fn record(&self, event: &ValidationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ValidationAuditSink for FileAuditSink {
    fn record(&self, event: &ValidationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ValidationAuditSink for NoopAuditSink {
    fn record(&self, _event: &ValidationAuditEvent) {}
}
