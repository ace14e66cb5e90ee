// crates/session-check-api/src/app_bar.rs
// ============================================================================
// Module: App Bar Contracts
// Description: Contracts for `appBar` and `appBar.data.*`.
// Purpose: Validate app bar buttons and the pages or panes they open.
// Dependencies: session-check-core
// ============================================================================

//! ## Overview
//! Every app bar entry is keyed by the id it opens: `page` entries must key a
//! page id and `pane` entries a pane id. The app bar is validated last so
//! both id sets are available.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use session_check_core::Context;
use session_check_core::Contract;
use session_check_core::ContractShape;
use session_check_core::ContextKey;
use session_check_core::NestedFailure;
use session_check_core::Node;
use session_check_core::PathTracker;
use session_check_core::SpecError;
use session_check_core::checks::ACCEPTED_PREVIEW_LIMIT;
use session_check_core::checks::check_list_kinds;
use session_check_core::checks::check_rgba;
use session_check_core::diagnostics::preview_list;
use session_check_core::dispatch_child;
use session_check_core::kinds;

use crate::keys;

// ============================================================================
// SECTION: Accepted Values
// ============================================================================

/// App bar entry types.
pub const APP_BAR_TYPES: [&str; 5] = ["session", "settings", "button", "pane", "page"];

/// App bar slots.
pub const APP_BAR_SLOTS: [&str; 4] = ["upperLeft", "lowerLeft", "upperRight", "lowerRight"];

/// Pane presentation variants.
pub const PANE_VARIANTS: [&str; 2] = ["modal", "wall"];

// ============================================================================
// SECTION: App Bar
// ============================================================================

/// Contract for `appBar`.
pub static APP_BAR: Contract = Contract::new("appBar", resolve_app_bar).with_nested(app_bar_nested);

/// Contract for `appBar.data.*`.
pub static APP_BAR_DATA: Contract =
    Contract::new("appBar_data", resolve_app_bar_data).with_nested(app_bar_data_nested);

/// App bar container fields.
fn resolve_app_bar(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .optional("data", kinds::MAPPING)
        .optional("allowModification", kinds::BOOLEAN)
        .optional("sendToApi", kinds::BOOLEAN)
        .optional("sendToClient", kinds::BOOLEAN))
}

/// Dispatches every app bar entry.
fn app_bar_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    dispatch_child(node, "data", &APP_BAR_DATA, tracker, ctx);
    Ok(())
}

/// Decision table for one app bar entry.
fn resolve_app_bar_data(node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    let entry_type = node.str("type");
    let variants: &[&str] = if entry_type == Some("pane") { &PANE_VARIANTS } else { &[] };
    Ok(ContractShape::new()
        .required("icon", kinds::STRING)
        .required("type", kinds::STRING)
        .required("bar", kinds::STRING)
        .optional("variant", kinds::STRING)
        .optional("color", kinds::STRING)
        .when(entry_type == Some("button"), |shape| {
            shape.optional("apiCommand", kinds::STRING).optional("apiCommandKeys", kinds::SEQUENCE)
        })
        .accepted("type", APP_BAR_TYPES)
        .accepted("bar", APP_BAR_SLOTS)
        .accepted("variant", variants.iter().copied()))
}

/// Checks colors, command keys, and the id an entry opens.
fn app_bar_data_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    if let Some(color) = node.str("color") {
        tracker.report_at("color", check_rgba(color));
    }
    if let Some(Value::Array(command_keys)) = node.get("apiCommandKeys") {
        tracker.report_at("apiCommandKeys", check_list_kinds(command_keys, kinds::STRING));
    }
    match node.str("type") {
        Some("page") => check_opened_id(ctx, keys::VALID_PAGE_IDS, "page", tracker),
        Some("pane") => check_opened_id(ctx, keys::VALID_PANE_IDS, "pane", tracker),
        _ => {}
    }
    Ok(())
}

/// Reports an entry whose key is not a declared id of `kind`.
fn check_opened_id(ctx: &Context, ids_key: ContextKey, kind: &str, tracker: &mut PathTracker<'_>) {
    let Some(entry_id) = ctx.current_field_id() else {
        return;
    };
    let valid_ids = ctx.ids(ids_key);
    if !valid_ids.iter().any(|id| id == entry_id) {
        tracker.error(format!(
            "`{entry_id}` does not match any valid {kind} ids {}",
            preview_list(valid_ids, ACCEPTED_PREVIEW_LIMIT)
        ));
    }
}
