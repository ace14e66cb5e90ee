// crates/session-check-core/src/context.rs
// ============================================================================
// Module: Validation Context
// Description: Read-only bag of caller parameters and cross-reference ids.
// Purpose: Thread validated-so-far identifiers into later validations.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! A [`Context`] is passed by shared reference into every contract. Adding an
//! entry never mutates the caller's context: [`Context::with`] returns a new
//! snapshot that only the receiving subtree sees. Missing cross-reference
//! sets read as empty, so a reference into an absent section is reported as
//! invalid instead of being skipped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;

// ============================================================================
// SECTION: Keys
// ============================================================================

/// Name of a context entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextKey(&'static str);

impl ContextKey {
    /// Creates a context key.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the key name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

/// Context keys understood by the engine itself.
pub mod keys {
    use super::ContextKey;

    /// Key of the mapping entry currently being validated by the dispatcher.
    pub const CURRENT_FIELD_ID: ContextKey = ContextKey::new("currentFieldId");
}

// ============================================================================
// SECTION: Values
// ============================================================================

/// One context entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    /// Single identifier or caller parameter.
    Text(String),
    /// Boolean caller parameter.
    Flag(bool),
    /// Flat id list.
    Ids(Vec<String>),
    /// Id lists keyed by owner id.
    IdMap(BTreeMap<String, Vec<String>>),
    /// Shared document fragment (e.g. a props mapping).
    Node(Arc<Value>),
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// Snapshot of caller parameters and cross-reference sets.
///
/// # Invariants
/// - Immutable once built; derived snapshots share the ignore set.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Field names skipped at every level of the document.
    ignore_keys: Arc<BTreeSet<String>>,
    /// Named entries.
    entries: BTreeMap<ContextKey, ContextValue>,
}

impl Context {
    /// Creates an empty context with no ignore keys.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty context skipping the given field names.
    #[must_use]
    pub fn with_ignore_keys<I, S>(ignore_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignore_keys: Arc::new(ignore_keys.into_iter().map(Into::into).collect()),
            entries: BTreeMap::new(),
        }
    }

    /// Returns the ignore set.
    #[must_use]
    pub fn ignore_keys(&self) -> &BTreeSet<String> {
        &self.ignore_keys
    }

    /// Returns true when `key` is skipped everywhere.
    #[must_use]
    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignore_keys.contains(key)
    }

    /// Returns a new snapshot with `key` set to `value`.
    #[must_use]
    pub fn with(&self, key: ContextKey, value: ContextValue) -> Self {
        let mut next = self.clone();
        next.entries.insert(key, value);
        next
    }

    /// Returns a new snapshot with a text entry.
    #[must_use]
    pub fn with_text(&self, key: ContextKey, value: impl Into<String>) -> Self {
        self.with(key, ContextValue::Text(value.into()))
    }

    /// Returns a new snapshot with an id list entry.
    #[must_use]
    pub fn with_ids(&self, key: ContextKey, ids: Vec<String>) -> Self {
        self.with(key, ContextValue::Ids(ids))
    }

    /// Returns a new snapshot with a flag entry.
    #[must_use]
    pub fn with_flag(&self, key: ContextKey, value: bool) -> Self {
        self.with(key, ContextValue::Flag(value))
    }

    /// Returns a new snapshot with an id map entry.
    #[must_use]
    pub fn with_id_map(&self, key: ContextKey, map: BTreeMap<String, Vec<String>>) -> Self {
        self.with(key, ContextValue::IdMap(map))
    }

    /// Returns a new snapshot with a document fragment entry.
    #[must_use]
    pub fn with_node(&self, key: ContextKey, node: Value) -> Self {
        self.with(key, ContextValue::Node(Arc::new(node)))
    }

    /// Returns the raw entry for `key`.
    #[must_use]
    pub fn get(&self, key: ContextKey) -> Option<&ContextValue> {
        self.entries.get(&key)
    }

    /// Returns a text entry.
    #[must_use]
    pub fn text(&self, key: ContextKey) -> Option<&str> {
        match self.entries.get(&key) {
            Some(ContextValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a flag entry, false when absent.
    #[must_use]
    pub fn flag(&self, key: ContextKey) -> bool {
        matches!(self.entries.get(&key), Some(ContextValue::Flag(true)))
    }

    /// Returns an id list, empty when absent.
    #[must_use]
    pub fn ids(&self, key: ContextKey) -> &[String] {
        match self.entries.get(&key) {
            Some(ContextValue::Ids(ids)) => ids,
            _ => &[],
        }
    }

    /// Returns an id map when present.
    #[must_use]
    pub fn id_map(&self, key: ContextKey) -> Option<&BTreeMap<String, Vec<String>>> {
        match self.entries.get(&key) {
            Some(ContextValue::IdMap(map)) => Some(map),
            _ => None,
        }
    }

    /// Returns the ids listed under `owner` in an id map, empty when absent.
    #[must_use]
    pub fn ids_for(&self, key: ContextKey, owner: &str) -> &[String] {
        self.id_map(key).and_then(|map| map.get(owner)).map_or(&[], Vec::as_slice)
    }

    /// Returns a document fragment entry.
    #[must_use]
    pub fn node(&self, key: ContextKey) -> Option<&Value> {
        match self.entries.get(&key) {
            Some(ContextValue::Node(node)) => Some(node),
            _ => None,
        }
    }

    /// Returns the key set by the custom-key dispatcher, if any.
    #[must_use]
    pub fn current_field_id(&self) -> Option<&str> {
        self.text(keys::CURRENT_FIELD_ID)
    }
}
