// crates/session-check-core/src/engine.rs
// ============================================================================
// Module: Validator Core
// Description: Recursive contract checking, custom-key dispatch, failure barrier.
// Purpose: Validate one node against one contract and recurse into children.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! [`validate`] runs three phases for one node:
//!
//! 1. Spec evaluation: mapping check, shape resolution, missing required
//!    fields, and field kinds. Any failure becomes a single
//!    `Error validating spec: ...` diagnostic and ends the node.
//!    Undeclared fields produce one `Unknown Fields` warning.
//! 2. Accepted values: every present field with an allow-list is flattened
//!    and subset-checked.
//! 3. Nested hook, wrapped in [`failure_barrier`].
//!
//! [`dispatch_keys`] applies one contract to every entry of a wildcard
//! mapping, exposing the entry key as `currentFieldId`. The engine never
//! returns an error to its caller; everything lands in the log.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::checks::check_subset;
use crate::checks::selection_of;
use crate::context::Context;
use crate::context::keys;
use crate::contract::Contract;
use crate::contract::ContractShape;
use crate::contract::FieldKind;
use crate::contract::NestedFailure;
use crate::contract::Node;
use crate::contract::SpecError;
use crate::contract::value_kind_label;
use crate::diagnostics::PathSegment;
use crate::diagnostics::ValidationLog;
use crate::diagnostics::quote_list;
use crate::path::PathTracker;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Time-series auxiliary fields exempt from field enforcement at every node.
pub const RESERVED_FIELDS: [&str; 2] = ["order", "timeValues"];

/// Returns true for the reserved time-series field names.
#[must_use]
pub fn is_reserved(field: &str) -> bool {
    RESERVED_FIELDS.contains(&field)
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Terminal state of one node's validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOutcome {
    /// The contract could not be evaluated; no nested phase ran.
    SpecInvalid,
    /// Spec evaluation passed and the nested phase completed.
    NestedValidated,
    /// Spec evaluation passed but the nested hook failed.
    NestedFailed,
}

// ============================================================================
// SECTION: Validator Core
// ============================================================================

/// Validates `value` against `contract`, reporting through `tracker`.
pub fn validate(
    value: &Value,
    contract: &Contract,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> NodeOutcome {
    let Value::Object(fields) = value else {
        report_spec_error(
            tracker,
            &SpecError::NotMapping {
                found: value_kind_label(value),
            },
        );
        return NodeOutcome::SpecInvalid;
    };
    let node = Node::new(fields, ctx.ignore_keys());
    let shape = match evaluate_spec(&node, contract, ctx) {
        Ok(shape) => shape,
        Err(err) => {
            report_spec_error(tracker, &err);
            return NodeOutcome::SpecInvalid;
        }
    };
    warn_unknown_fields(&node, &shape, tracker);
    check_accepted_values(&node, &shape, tracker);
    match contract.nested() {
        None => NodeOutcome::NestedValidated,
        Some(hook) => {
            if failure_barrier(tracker, |inner| hook(&node, inner, ctx)) {
                NodeOutcome::NestedValidated
            } else {
                NodeOutcome::NestedFailed
            }
        }
    }
}

/// Validates `value` at an absolute `prefix` of `log`.
pub fn validate_at(
    value: &Value,
    contract: &Contract,
    log: &mut ValidationLog,
    prefix: Vec<PathSegment>,
    ctx: &Context,
) -> NodeOutcome {
    let mut tracker = PathTracker::with_prefix(log, prefix);
    validate(value, contract, &mut tracker, ctx)
}

/// Resolves the shape and runs the presence and kind checks.
fn evaluate_spec(
    node: &Node<'_>,
    contract: &Contract,
    ctx: &Context,
) -> Result<ContractShape, SpecError> {
    let shape = contract.resolve(node, ctx)?;
    let missing: Vec<String> = shape
        .fields()
        .iter()
        .filter(|rule| rule.required && !is_reserved(rule.name) && !node.contains(rule.name))
        .map(|rule| rule.name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SpecError::MissingFields {
            fields: missing,
        });
    }
    for rule in shape.fields() {
        if is_reserved(rule.name) {
            continue;
        }
        if let Some(value) = node.get(rule.name)
            && !FieldKind::any_matches(rule.kinds, value)
        {
            return Err(SpecError::WrongType {
                field: rule.name.to_string(),
                expected: FieldKind::labels(rule.kinds),
                found: value_kind_label(value),
            });
        }
    }
    Ok(shape)
}

/// Emits the single spec-evaluation diagnostic for a node.
fn report_spec_error(tracker: &mut PathTracker<'_>, err: &SpecError) {
    let message = format!("Error validating spec: {err}");
    match err.anchor() {
        Some(field) => tracker.error_at(field, message),
        None => tracker.error(message),
    }
}

/// Emits one warning listing fields the shape does not declare.
fn warn_unknown_fields(node: &Node<'_>, shape: &ContractShape, tracker: &mut PathTracker<'_>) {
    if shape.is_open() {
        return;
    }
    let unknown: Vec<&str> = node
        .keys()
        .map(String::as_str)
        .filter(|key| !is_reserved(key) && !shape.is_declared(key))
        .collect();
    if !unknown.is_empty() {
        tracker.warn(format!("Unknown Fields: {}", quote_list(&unknown)));
    }
}

/// Subset-checks every present field that carries an allow-list.
fn check_accepted_values(node: &Node<'_>, shape: &ContractShape, tracker: &mut PathTracker<'_>) {
    for (field, accepted) in shape.accepted_values() {
        let Some(selected) = node.get(field).and_then(selection_of) else {
            continue;
        };
        tracker.report_at(*field, check_subset(&selected, accepted));
    }
}

// ============================================================================
// SECTION: Failure Barrier
// ============================================================================

/// Runs a nested hook, converting a [`NestedFailure`] into one diagnostic.
///
/// Returns true when the hook completed. Panics are not intercepted.
pub fn failure_barrier<F>(tracker: &mut PathTracker<'_>, hook: F) -> bool
where
    F: FnOnce(&mut PathTracker<'_>) -> Result<(), NestedFailure>,
{
    match hook(tracker) {
        Ok(()) => true,
        Err(failure) => {
            tracker.error(format!(
                "Extended spec validations failed (likely due to another error with your API \
                 data). Error: {failure}"
            ));
            false
        }
    }
}

// ============================================================================
// SECTION: Custom-Key Dispatcher
// ============================================================================

/// Validates every entry of the wildcard mapping `container` against `child`.
///
/// Each entry is reported under `prefix ++ [key]` and sees its key as
/// `currentFieldId`. Non-mapping entries are reported and skipped; the
/// remaining keys are still validated.
pub fn dispatch_keys(
    container: &Value,
    child: &Contract,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) {
    let Value::Object(entries) = container else {
        tracker.error(format!(
            "Error validating custom keys: a mapping is required but received {}",
            value_kind_label(container)
        ));
        return;
    };
    for (key, value) in entries {
        if ctx.is_ignored(key) {
            continue;
        }
        if !value.is_object() {
            tracker.error_at(
                key,
                format!(
                    "Error for field ({key}): a mapping is required but received {}",
                    value_kind_label(value)
                ),
            );
            continue;
        }
        let child_ctx = ctx.with_text(keys::CURRENT_FIELD_ID, key.as_str());
        validate(value, child, &mut tracker.nested(key), &child_ctx);
    }
}

// ============================================================================
// SECTION: Child Helpers
// ============================================================================

/// Validates `node[field]` against `contract` when the field is present.
pub fn validate_child(
    node: &Node<'_>,
    field: &str,
    contract: &Contract,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Option<NodeOutcome> {
    let value = node.get(field)?;
    Some(validate(value, contract, &mut tracker.nested(field), ctx))
}

/// Dispatches `node[field]` to [`dispatch_keys`] when the field is present.
pub fn dispatch_child(
    node: &Node<'_>,
    field: &str,
    contract: &Contract,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) {
    if let Some(value) = node.get(field) {
        dispatch_keys(value, contract, &mut tracker.nested(field), ctx);
    }
}

/// Validates every element of a sequence, indexing the path by position.
pub fn validate_sequence(
    items: &[Value],
    contract: &Contract,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) {
    for (index, item) in items.iter().enumerate() {
        validate(item, contract, &mut tracker.nested(index), ctx);
    }
}
