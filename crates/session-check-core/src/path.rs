// crates/session-check-core/src/path.rs
// ============================================================================
// Module: Path Tracker
// Description: Prefix-scoped view over the validation log.
// Purpose: Resolve relative diagnostic paths to absolute document paths.
// Dependencies: none
// ============================================================================

//! ## Overview
//! A [`PathTracker`] borrows the run's [`ValidationLog`] together with an
//! immutable prefix. Descending into a child builds a fresh tracker with the
//! child segment appended; the parent's prefix never changes, so sibling
//! subtrees cannot observe each other's location.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;

use crate::diagnostics::PathSegment;
use crate::diagnostics::Severity;
use crate::diagnostics::ValidationLog;

// ============================================================================
// SECTION: Path Tracker
// ============================================================================

/// Log handle bound to a document location.
///
/// # Invariants
/// - `prefix` is fixed for the lifetime of the tracker.
/// - Every entry written through the tracker is stored at `prefix ++ path`.
#[derive(Debug)]
pub struct PathTracker<'log> {
    /// Shared run log.
    log: &'log mut ValidationLog,
    /// Absolute location of the node this tracker reports for.
    prefix: Vec<PathSegment>,
}

impl<'log> PathTracker<'log> {
    /// Creates a tracker positioned at the document root.
    pub const fn root(log: &'log mut ValidationLog) -> Self {
        Self {
            log,
            prefix: Vec::new(),
        }
    }

    /// Creates a tracker positioned at an explicit prefix.
    pub const fn with_prefix(log: &'log mut ValidationLog, prefix: Vec<PathSegment>) -> Self {
        Self {
            log,
            prefix,
        }
    }

    /// Returns the absolute prefix of this tracker.
    #[must_use]
    pub fn prefix(&self) -> &[PathSegment] {
        &self.prefix
    }

    /// Returns a tracker for a child location; the parent stays untouched.
    pub fn nested(&mut self, segment: impl Into<PathSegment>) -> PathTracker<'_> {
        let mut prefix = self.prefix.clone();
        prefix.push(segment.into());
        PathTracker {
            log: self.log,
            prefix,
        }
    }

    /// Appends an entry at `prefix ++ path`.
    pub fn add(&mut self, path: &[PathSegment], message: impl Into<String>, level: Severity) {
        let mut absolute = self.prefix.clone();
        absolute.extend_from_slice(path);
        self.log.add(absolute, message, level);
    }

    /// Appends an error at the tracker's own location.
    pub fn error(&mut self, message: impl Into<String>) {
        self.add(&[], message, Severity::Error);
    }

    /// Appends a warning at the tracker's own location.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.add(&[], message, Severity::Warning);
    }

    /// Appends an error one level below the tracker, at `field`.
    pub fn error_at(&mut self, field: impl Into<PathSegment>, message: impl Into<String>) {
        self.add(&[field.into()], message, Severity::Error);
    }

    /// Reports a failed check at the tracker's location. Returns true when the check passed.
    pub fn report<E: Display>(&mut self, result: Result<(), E>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                self.error(err.to_string());
                false
            }
        }
    }

    /// Reports a failed check at `field`. Returns true when the check passed.
    pub fn report_at<E: Display>(
        &mut self,
        field: impl Into<PathSegment>,
        result: Result<(), E>,
    ) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                self.error_at(field, err.to_string());
                false
            }
        }
    }
}
