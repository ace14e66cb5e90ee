// crates/session-check-core/src/diagnostics.rs
// ============================================================================
// Module: Validation Diagnostics
// Description: Path-tagged error and warning entries plus the per-run log.
// Purpose: Accumulate every finding of a validation run in traversal order.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A validation run owns exactly one [`ValidationLog`]. Every finding is a
//! [`Diagnostic`] carrying the ordered path segments that locate it in the
//! session document, a human-readable message, and a [`Severity`].
//! Entries are never deduplicated; the order of the log is the order of the
//! depth-first traversal, so two runs over the same document produce the same
//! list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Path Segments
// ============================================================================

/// One step of a document path: a mapping key or a sequence index.
///
/// # Invariants
/// - Serializes untagged, so a path renders as `["pages", "data", "home", 0]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Sequence index.
    Index(usize),
    /// Mapping key.
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        Self::Key(value.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        Self::Key(value)
    }
}

impl From<&String> for PathSegment {
    fn from(value: &String) -> Self {
        Self::Key(value.clone())
    }
}

impl From<usize> for PathSegment {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

/// Renders a path for humans: keys joined by `.`, indices as `[i]`.
///
/// The empty path renders as `<root>`.
#[must_use]
pub fn render_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return "<root>".to_string();
    }
    let mut rendered = String::new();
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                if !rendered.is_empty() {
                    rendered.push('.');
                }
                rendered.push_str(key);
            }
            PathSegment::Index(index) => {
                rendered.push_str(&format!("[{index}]"));
            }
        }
    }
    rendered
}

// ============================================================================
// SECTION: Diagnostics
// ============================================================================

/// Severity of a diagnostic.
///
/// # Invariants
/// - Only [`Severity::Error`] entries make a document invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The document violates its contract.
    Error,
    /// The document carries something suspicious but tolerated.
    Warning,
}

impl Severity {
    /// Returns the stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One path-tagged finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Absolute location inside the session document.
    pub path: Vec<PathSegment>,
    /// Human-readable description.
    pub message: String,
    /// Severity level.
    pub level: Severity,
}

impl Diagnostic {
    /// Returns true for error-level entries.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == Severity::Error
    }

    /// Returns the rendered path (see [`render_path`]).
    #[must_use]
    pub fn path_display(&self) -> String {
        render_path(&self.path)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.level, render_path(&self.path), self.message)
    }
}

// ============================================================================
// SECTION: Log Collector
// ============================================================================

/// Accumulator for the diagnostics of a single validation run.
///
/// # Invariants
/// - Append-only; entry order equals insertion order.
/// - Identical entries are kept as separate entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationLog {
    /// Entries in traversal order.
    entries: Vec<Diagnostic>,
}

impl ValidationLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends one entry at an absolute path.
    pub fn add(&mut self, path: Vec<PathSegment>, message: impl Into<String>, level: Severity) {
        self.entries.push(Diagnostic {
            path,
            message: message.into(),
            level,
        });
    }

    /// Returns true when at least one error-level entry exists.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(Diagnostic::is_error)
    }

    /// Returns true when at least one warning-level entry exists.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.entries.iter().any(|entry| entry.level == Severity::Warning)
    }

    /// Returns every entry in traversal order.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Iterates every entry in traversal order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Iterates error-level entries.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|entry| entry.is_error())
    }

    /// Iterates warning-level entries.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|entry| entry.level == Severity::Warning)
    }

    /// Number of error-level entries.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Number of warning-level entries.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ValidationLog {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// SECTION: Message Formatting
// ============================================================================

/// Formats values as a quoted list, e.g. `['a', 'b']`.
#[must_use]
pub fn quote_list<S: AsRef<str>>(values: &[S]) -> String {
    let quoted: Vec<String> = values.iter().map(|value| format!("'{}'", value.as_ref())).collect();
    format!("[{}]", quoted.join(", "))
}

/// Formats at most `limit` values followed by an ellipsis marker when longer.
#[must_use]
pub fn preview_list<S: AsRef<str>>(values: &[S], limit: usize) -> String {
    if values.len() <= limit {
        return quote_list(values);
    }
    let mut shown: Vec<&str> = values.iter().take(limit).map(AsRef::as_ref).collect();
    shown.push("...");
    quote_list(&shown)
}
