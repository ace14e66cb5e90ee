// crates/session-check-api/src/settings.rs
// ============================================================================
// Module: Settings Contracts
// Description: Contracts for `settings` and its demo, sync, time, and defaults.
// Purpose: Validate application-wide settings.
// Dependencies: session-check-core
// ============================================================================

//! ## Overview
//! `settings.iconUrl` is the only field every document must provide. The
//! remaining blocks are optional; `time` is only checked when it carries at
//! least one entry.

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
use session_check_core::checks::check_url;
use session_check_core::dispatch_child;
use session_check_core::kinds;
use session_check_core::validate_child;

use crate::general::UNIT_PLACEMENTS;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Contract for `settings`.
pub static SETTINGS: Contract =
    Contract::new("settings", resolve_settings).with_nested(settings_nested);

/// Top-level settings fields.
fn resolve_settings(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .required("iconUrl", kinds::STRING)
        .optional("demo", kinds::MAPPING)
        .optional("sync", kinds::MAPPING)
        .optional("time", kinds::MAPPING)
        .optional("defaults", kinds::MAPPING)
        .optional("debug", kinds::BOOLEAN))
}

/// Checks the icon bundle URL and walks the settings blocks.
fn settings_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    if let Some(icon_url) = node.str("iconUrl") {
        tracker.report_at("iconUrl", check_url(icon_url));
    }
    dispatch_child(node, "sync", &SETTINGS_SYNC, tracker, ctx);
    dispatch_child(node, "demo", &SETTINGS_DEMO, tracker, ctx);
    if node.mapping("time")?.is_some_and(|time| !time.is_empty()) {
        validate_child(node, "time", &SETTINGS_TIME, tracker, ctx);
    }
    validate_child(node, "defaults", &SETTINGS_DEFAULTS, tracker, ctx);
    Ok(())
}

// ============================================================================
// SECTION: Settings Blocks
// ============================================================================

/// Contract for `settings.demo.*`.
pub static SETTINGS_DEMO: Contract = Contract::new("settings_demo", resolve_demo);

/// Contract for `settings.sync.*`.
pub static SETTINGS_SYNC: Contract = Contract::new("settings_sync", resolve_sync);

/// Contract for `settings.time`.
pub static SETTINGS_TIME: Contract =
    Contract::new("settings_time", resolve_time).with_nested(time_nested);

/// Contract for `settings.defaults`.
pub static SETTINGS_DEFAULTS: Contract = Contract::new("settings_defaults", resolve_defaults);

/// Demo playback options for one page or map.
fn resolve_demo(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .optional("scrollSpeed", kinds::NUMBER)
        .optional("displayTime", kinds::INTEGER))
}

/// One server sync toggle.
fn resolve_sync(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .required("name", kinds::STRING)
        .required("showToggle", kinds::BOOLEAN)
        .required("value", kinds::BOOLEAN)
        .required("data", kinds::MAPPING))
}

/// Time axis configuration.
fn resolve_time(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .required("timeLength", kinds::INTEGER)
        .required("timeUnits", kinds::STRING))
}

/// Requires a positive number of time steps.
fn time_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    _ctx: &Context,
) -> Result<(), NestedFailure> {
    if let Some(length) = node.get("timeLength").and_then(serde_json::Value::as_i64)
        && length < 1
    {
        tracker.error_at("timeLength", format!("`timeLength` must be positive but got {length}."));
    }
    Ok(())
}

/// Display defaults applied to every prop.
fn resolve_defaults(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .optional("precision", kinds::INTEGER)
        .optional("trailingZeros", kinds::BOOLEAN)
        .optional("unitPlacement", kinds::STRING)
        .optional("showToolbar", kinds::BOOLEAN)
        .accepted("unitPlacement", UNIT_PLACEMENTS))
}
