// crates/session-check-core/src/contract.rs
// ============================================================================
// Module: Contract Model
// Description: Declarative node contracts, field kinds, and engine error kinds.
// Purpose: Describe one node shape as data plus an optional nested hook.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`Contract`] pairs a resolve function with an optional nested hook. The
//! resolve function is a pure decision table: it reads sibling values of the
//! node being validated and returns the [`ContractShape`] that applies to this
//! instance (required and optional fields with their kinds, accepted-value
//! lists, and whether undeclared fields are tolerated). The nested hook walks
//! child nodes after the shape checks pass.
//!
//! Two narrow error kinds exist. [`SpecError`] means the contract could not be
//! evaluated for a node and halts that node's subtree. [`NestedFailure`]
//! means a hook met data it could not walk; the engine turns it into one
//! diagnostic and continues with siblings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::context::Context;
use crate::diagnostics::quote_list;
use crate::path::PathTracker;

// ============================================================================
// SECTION: Field Kinds
// ============================================================================

/// Semantic type accepted for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// JSON string.
    String,
    /// Any JSON number.
    Number,
    /// JSON integer (no fractional part).
    Integer,
    /// JSON boolean.
    Boolean,
    /// JSON object.
    Mapping,
    /// JSON array.
    Sequence,
    /// JSON null.
    Null,
    /// Anything, including null.
    Any,
}

impl FieldKind {
    /// Returns true when `value` is of this kind.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Mapping => value.is_object(),
            Self::Sequence => value.is_array(),
            Self::Null => value.is_null(),
            Self::Any => true,
        }
    }

    /// Returns the label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Mapping => "mapping",
            Self::Sequence => "sequence",
            Self::Null => "null",
            Self::Any => "any",
        }
    }

    /// Returns true when `value` matches at least one kind of the union.
    #[must_use]
    pub fn any_matches(kinds: &[Self], value: &Value) -> bool {
        kinds.iter().any(|kind| kind.matches(value))
    }

    /// Returns the labels of a union, in declaration order.
    #[must_use]
    pub fn labels(kinds: &[Self]) -> Vec<&'static str> {
        kinds.iter().map(|kind| kind.label()).collect()
    }
}

/// Returns the label of the kind a value actually has.
#[must_use]
pub const fn value_kind_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Common kind unions.
pub mod kinds {
    use super::FieldKind;

    /// String only.
    pub const STRING: &[FieldKind] = &[FieldKind::String];
    /// Any number.
    pub const NUMBER: &[FieldKind] = &[FieldKind::Number];
    /// Integer only.
    pub const INTEGER: &[FieldKind] = &[FieldKind::Integer];
    /// Boolean only.
    pub const BOOLEAN: &[FieldKind] = &[FieldKind::Boolean];
    /// Mapping only.
    pub const MAPPING: &[FieldKind] = &[FieldKind::Mapping];
    /// Sequence only.
    pub const SEQUENCE: &[FieldKind] = &[FieldKind::Sequence];
    /// Anything.
    pub const ANY: &[FieldKind] = &[FieldKind::Any];
    /// String or sequence.
    pub const STRING_OR_SEQUENCE: &[FieldKind] = &[FieldKind::String, FieldKind::Sequence];
    /// String or integer.
    pub const STRING_OR_INTEGER: &[FieldKind] = &[FieldKind::String, FieldKind::Integer];
    /// Mapping or string.
    pub const MAPPING_OR_STRING: &[FieldKind] = &[FieldKind::Mapping, FieldKind::String];
    /// String or number.
    pub const STRING_OR_NUMBER: &[FieldKind] = &[FieldKind::String, FieldKind::Number];
    /// Scalar value: string, number, or boolean.
    pub const SCALAR: &[FieldKind] = &[FieldKind::String, FieldKind::Number, FieldKind::Boolean];
}

// ============================================================================
// SECTION: Contract Shape
// ============================================================================

/// One declared field of a resolved shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    /// Field name.
    pub name: &'static str,
    /// Accepted kinds (a union).
    pub kinds: &'static [FieldKind],
    /// Whether the field must be present.
    pub required: bool,
}

/// Shape of a node as resolved for one instance.
///
/// # Invariants
/// - Field names are unique; redeclaring a field replaces its rule in place.
/// - Declaration order is preserved and drives diagnostic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractShape {
    /// Declared fields.
    fields: Vec<FieldRule>,
    /// Accepted-value lists in declaration order.
    accepted: Vec<(&'static str, Vec<String>)>,
    /// Whether undeclared fields are tolerated silently.
    open: bool,
}

impl ContractShape {
    /// Creates an empty shape.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: Vec::new(),
            accepted: Vec::new(),
            open: false,
        }
    }

    /// Declares a required field.
    #[must_use]
    pub fn required(self, name: &'static str, kinds: &'static [FieldKind]) -> Self {
        self.field(name, kinds, true)
    }

    /// Declares an optional field.
    #[must_use]
    pub fn optional(self, name: &'static str, kinds: &'static [FieldKind]) -> Self {
        self.field(name, kinds, false)
    }

    /// Declares or redeclares a field.
    #[must_use]
    pub fn field(
        mut self,
        name: &'static str,
        kinds: &'static [FieldKind],
        required: bool,
    ) -> Self {
        let rule = FieldRule {
            name,
            kinds,
            required,
        };
        if let Some(existing) = self.fields.iter_mut().find(|field| field.name == name) {
            *existing = rule;
        } else {
            self.fields.push(rule);
        }
        self
    }

    /// Applies `extend` only when `condition` holds.
    #[must_use]
    pub fn when(self, condition: bool, extend: impl FnOnce(Self) -> Self) -> Self {
        if condition { extend(self) } else { self }
    }

    /// Sets the accepted-value list of a field.
    #[must_use]
    pub fn accepted<I, S>(mut self, name: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if let Some(existing) = self.accepted.iter_mut().find(|(field, _)| *field == name) {
            existing.1 = values;
        } else {
            self.accepted.push((name, values));
        }
        self
    }

    /// Tolerates undeclared fields without a warning.
    #[must_use]
    pub const fn open(mut self) -> Self {
        self.open = true;
        self
    }

    /// Returns declared fields in order.
    #[must_use]
    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    /// Returns the rule for `name`.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns true when `name` is declared (required or optional).
    #[must_use]
    pub fn is_declared(&self, name: &str) -> bool {
        self.rule(name).is_some()
    }

    /// Returns accepted-value lists in declaration order.
    #[must_use]
    pub fn accepted_values(&self) -> &[(&'static str, Vec<String>)] {
        &self.accepted
    }

    /// Returns true when undeclared fields are tolerated.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// The contract could not be evaluated for a node.
///
/// # Invariants
/// - Reported once per node; the node's accepted values and nested hook are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// The node is not a mapping.
    #[error("expected a mapping but received {found}")]
    NotMapping {
        /// Kind actually found.
        found: &'static str,
    },
    /// Required fields are absent.
    #[error("Missing required fields: {}", quote_list(.fields))]
    MissingFields {
        /// Missing field names in declaration order.
        fields: Vec<String>,
    },
    /// A declared field has a kind outside its union.
    #[error("({field}) Invalid Type: expected one of {} but received {found}", quote_list(.expected))]
    WrongType {
        /// Offending field.
        field: String,
        /// Accepted kind labels.
        expected: Vec<&'static str>,
        /// Kind actually found.
        found: &'static str,
    },
    /// Contract-specific refusal.
    #[error("{0}")]
    Invalid(String),
}

impl SpecError {
    /// Returns the field the diagnostic should be anchored at, if any.
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        match self {
            Self::MissingFields {
                fields,
            } if fields.len() == 1 => fields.first().map(String::as_str),
            Self::WrongType {
                field, ..
            } => Some(field),
            _ => None,
        }
    }
}

/// A nested hook met data it could not walk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NestedFailure {
    /// A child value has an unexpected kind.
    #[error("({field}) expected {expected} but received {found}")]
    UnexpectedKind {
        /// Offending field.
        field: String,
        /// Expected kind label.
        expected: &'static str,
        /// Kind actually found.
        found: &'static str,
    },
    /// Any other structural problem.
    #[error("{0}")]
    Malformed(String),
}

impl NestedFailure {
    /// Builds an [`NestedFailure::UnexpectedKind`] for `value`.
    #[must_use]
    pub fn unexpected(field: &str, expected: FieldKind, value: &Value) -> Self {
        Self::UnexpectedKind {
            field: field.to_string(),
            expected: expected.label(),
            found: value_kind_label(value),
        }
    }
}

// ============================================================================
// SECTION: Node View
// ============================================================================

/// Mapping node seen through the run's ignore set.
///
/// # Invariants
/// - Ignored keys behave as if they were absent.
/// - A `null` field reads as absent through [`Node::get`], so optional fields
///   may be explicitly unset. [`Node::keys`] and [`Node::iter`] still list it.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    /// Underlying mapping.
    fields: &'a Map<String, Value>,
    /// Keys skipped everywhere.
    ignored: &'a BTreeSet<String>,
}

impl<'a> Node<'a> {
    /// Wraps a mapping.
    #[must_use]
    pub const fn new(fields: &'a Map<String, Value>, ignored: &'a BTreeSet<String>) -> Self {
        Self {
            fields,
            ignored,
        }
    }

    /// Returns the value of `key` unless absent, `null`, or ignored.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        if self.ignored.contains(key) {
            return None;
        }
        self.fields.get(key).filter(|value| !value.is_null())
    }

    /// Returns true when `key` holds a non-null value and is not ignored.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns `key` as a string when it is one.
    #[must_use]
    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns `key` as a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`NestedFailure::UnexpectedKind`] when present but not a mapping.
    pub fn mapping(&self, key: &str) -> Result<Option<&'a Map<String, Value>>, NestedFailure> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(other) => Err(NestedFailure::unexpected(key, FieldKind::Mapping, other)),
        }
    }

    /// Returns `key` as a sequence.
    ///
    /// # Errors
    ///
    /// Returns [`NestedFailure::UnexpectedKind`] when present but not a sequence.
    pub fn sequence(&self, key: &str) -> Result<Option<&'a [Value]>, NestedFailure> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(other) => Err(NestedFailure::unexpected(key, FieldKind::Sequence, other)),
        }
    }

    /// Returns the keys of a child mapping, empty when absent or not a mapping.
    #[must_use]
    pub fn child_keys(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Object(map)) => visible_keys(map, self.ignored),
            _ => Vec::new(),
        }
    }

    /// Iterates visible keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &'a String> {
        let ignored = self.ignored;
        self.fields.keys().filter(move |key| !ignored.contains(key.as_str()))
    }

    /// Iterates visible entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a String, &'a Value)> {
        let ignored = self.ignored;
        self.fields.iter().filter(move |(key, _)| !ignored.contains(key.as_str()))
    }

    /// Views a child mapping through the same ignore set.
    #[must_use]
    pub const fn child(&self, fields: &'a Map<String, Value>) -> Self {
        Self {
            fields,
            ignored: self.ignored,
        }
    }
}

/// Returns the keys of `map` not listed in `ignored`, in document order.
#[must_use]
pub fn visible_keys(map: &Map<String, Value>, ignored: &BTreeSet<String>) -> Vec<String> {
    map.keys().filter(|key| !ignored.contains(key.as_str())).cloned().collect()
}

// ============================================================================
// SECTION: Contracts
// ============================================================================

/// Decision table computing the shape of one node instance.
pub type ResolveFn = fn(&Node<'_>, &Context) -> Result<ContractShape, SpecError>;

/// Walks child nodes once the shape checks passed.
pub type NestedHook = fn(&Node<'_>, &mut PathTracker<'_>, &Context) -> Result<(), NestedFailure>;

/// Declarative contract for one node kind.
///
/// # Invariants
/// - Contracts are plain data; they hold no engine state and are usable as statics.
#[derive(Clone, Copy)]
pub struct Contract {
    /// Stable contract name.
    name: &'static str,
    /// Shape resolver.
    resolve: ResolveFn,
    /// Optional nested hook.
    nested: Option<NestedHook>,
}

impl Contract {
    /// Creates a contract without a nested hook.
    #[must_use]
    pub const fn new(name: &'static str, resolve: ResolveFn) -> Self {
        Self {
            name,
            resolve,
            nested: None,
        }
    }

    /// Attaches a nested hook.
    #[must_use]
    pub const fn with_nested(mut self, hook: NestedHook) -> Self {
        self.nested = Some(hook);
        self
    }

    /// Returns the contract name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Resolves the shape for one node.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] when the contract refuses the node.
    pub fn resolve(&self, node: &Node<'_>, ctx: &Context) -> Result<ContractShape, SpecError> {
        (self.resolve)(node, ctx)
    }

    /// Returns the nested hook, if any.
    #[must_use]
    pub const fn nested(&self) -> Option<NestedHook> {
        self.nested
    }
}

impl fmt::Debug for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contract")
            .field("name", &self.name)
            .field("nested", &self.nested.is_some())
            .finish()
    }
}

/// Resolver for contracts that accept any mapping without declared fields.
///
/// # Errors
///
/// Never fails.
pub fn open_shape(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new().open())
}
