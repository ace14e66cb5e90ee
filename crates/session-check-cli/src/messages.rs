// crates/session-check-cli/src/messages.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Provides the message catalog and placeholder substitution.
// Purpose: Centralize user-facing strings of the CLI.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! User-facing strings live in one catalog keyed by stable identifiers. All
//! runtime output should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageArg {
    /// The placeholder key to substitute.
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Catalog entries.
const CATALOG: &[(&str, &str)] = &[
    ("main.version", "session-check {version}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("input.read_failed", "Failed to read {kind} at {path}: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {kind} at {path}: {size} bytes exceeds limit of {limit} bytes",
    ),
    ("input.parse_failed", "Failed to parse {kind} at {path}: {error}"),
    ("input.kind.session", "session document"),
    ("audit.open_failed", "Failed to open audit log at {path}: {error}"),
    ("report.summary", "{errors} error(s), {warnings} warning(s)"),
    ("report.encode_failed", "Failed to encode diagnostics: {error}"),
    ("contracts.entry", "{path}\t{name}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
];

/// Returns the catalog as a lookup table.
fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG_MAP.get_or_init(|| CATALOG.iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Looks up `key` and substitutes `args` into its placeholders.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
///
/// Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::messages::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::messages::translate($key, args)
    }};
}
