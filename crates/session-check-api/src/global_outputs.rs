// crates/session-check-api/src/global_outputs.rs
// ============================================================================
// Module: Global Output Contracts
// Description: Contract for `globalOutputs`.
// Purpose: Validate session-wide output props, values, and layout.
// Dependencies: session-check-core
// ============================================================================

//! ## Overview
//! Global outputs share the props/values/layout structure of a pane. Their
//! prop ids are what dashboard pages reference through `globalOutputId`.

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
// SECTION: Global Outputs
// ============================================================================

/// Contract for `globalOutputs`.
pub static GLOBAL_OUTPUTS: Contract =
    Contract::new("globalOutputs", resolve_global_outputs).with_nested(global_outputs_nested);

/// Global output fields.
fn resolve_global_outputs(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .required("props", kinds::MAPPING)
        .optional("values", kinds::MAPPING)
        .optional("layout", kinds::MAPPING))
}

/// Validates props, then the values and layout that refer to them.
fn global_outputs_nested(
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
