// crates/session-check-api/src/panes.rs
// ============================================================================
// Module: Pane Contracts
// Description: Contracts for `panes` and `panes.data.*`.
// Purpose: Validate side panes built from props, values, and layouts.
// Dependencies: session-check-core
// ============================================================================

//! ## Overview
//! A pane bundles its own props with the values and layout that refer to
//! them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use session_check_core::Context;
use session_check_core::Contract;
use session_check_core::ContractShape;
use session_check_core::NestedFailure;
use session_check_core::Node;
use session_check_core::PathTracker;
use session_check_core::SpecError;
use session_check_core::dispatch_child;
use session_check_core::kinds;
use session_check_core::validate_child;

use crate::general::LAYOUT;
use crate::general::PROPS;
use crate::general::VALUES;
use crate::general::with_props;

// ============================================================================
// SECTION: Panes
// ============================================================================

/// Contract for `panes`.
pub static PANES: Contract = Contract::new("panes", resolve_panes).with_nested(panes_nested);

/// Contract for `panes.data.*`.
pub static PANE: Contract = Contract::new("panes_data", resolve_pane).with_nested(pane_nested);

/// Pane container fields.
fn resolve_panes(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new().optional("data", kinds::MAPPING))
}

/// Dispatches every pane.
fn panes_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    dispatch_child(node, "data", &PANE, tracker, ctx);
    Ok(())
}

/// Fields of one pane.
fn resolve_pane(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .required("name", kinds::STRING)
        .required("props", kinds::MAPPING)
        .optional("values", kinds::MAPPING)
        .optional("layout", kinds::MAPPING))
}

/// Validates props, then the values and layout that refer to them.
fn pane_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    dispatch_child(node, "props", &PROPS, tracker, ctx);
    let props_ctx = with_props(ctx, node, "props");
    validate_child(node, "values", &VALUES, tracker, &props_ctx);
    validate_child(node, "layout", &LAYOUT, tracker, &props_ctx);
    Ok(())
}
