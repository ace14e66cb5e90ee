// crates/session-check-api/src/maps.rs
// ============================================================================
// Module: Map Contracts
// Description: Contracts for `maps`, map styles, viewports, and legend groups.
// Purpose: Validate map definitions against the declared map features.
// Dependencies: session-check-core
// ============================================================================

//! ## Overview
//! Maps are validated after map features: every legend group entry is keyed
//! by a feature id and may only color or size that feature by one of its
//! own props. Viewports carry plain coordinates and are range checked.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use session_check_core::Context;
use session_check_core::Contract;
use session_check_core::ContractShape;
use session_check_core::NestedFailure;
use session_check_core::Node;
use session_check_core::PathTracker;
use session_check_core::SpecError;
use session_check_core::checks::ACCEPTED_PREVIEW_LIMIT;
use session_check_core::checks::Axis;
use session_check_core::checks::check_coordinates;
use session_check_core::checks::check_pixel;
use session_check_core::checks::check_rgba;
use session_check_core::diagnostics::preview_list;
use session_check_core::dispatch_child;
use session_check_core::kinds;
use session_check_core::validate_child;

use crate::general::COLOR_BY_OPTIONS;
use crate::general::SIZE_BY_OPTIONS;
use crate::keys;

// ============================================================================
// SECTION: Accepted Values
// ============================================================================

/// Map projections.
pub const MAP_PROJECTIONS: [&str; 2] = ["mercator", "globe"];

// ============================================================================
// SECTION: Maps
// ============================================================================

/// Contract for `maps`.
pub static MAPS: Contract = Contract::new("maps", resolve_maps).with_nested(maps_nested);

/// Contract for `maps.data.*`.
pub static MAP: Contract = Contract::new("maps_data", resolve_map).with_nested(map_nested);

/// Contract for `maps.additionalMapStyles.*`.
pub static MAP_STYLE: Contract = Contract::new("maps_additionalMapStyles", resolve_map_style);

/// Map container fields.
fn resolve_maps(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .optional("additionalMapStyles", kinds::MAPPING)
        .optional("data", kinds::MAPPING))
}

/// Dispatches every map and extra map style.
fn maps_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    dispatch_child(node, "data", &MAP, tracker, ctx);
    dispatch_child(node, "additionalMapStyles", &MAP_STYLE, tracker, ctx);
    Ok(())
}

/// Fields of one map.
fn resolve_map(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .required("name", kinds::STRING)
        .optional("currentStyle", kinds::STRING)
        .optional("currentProjection", kinds::STRING)
        .optional("defaultViewport", kinds::MAPPING)
        .optional("optionalViewports", kinds::MAPPING)
        .optional("legendGroups", kinds::MAPPING)
        .accepted("currentProjection", MAP_PROJECTIONS))
}

/// Validates viewports and legend groups.
fn map_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    validate_child(node, "defaultViewport", &VIEWPORT, tracker, ctx);
    dispatch_child(node, "optionalViewports", &OPTIONAL_VIEWPORT, tracker, ctx);
    dispatch_child(node, "legendGroups", &LEGEND_GROUP, tracker, ctx);
    Ok(())
}

/// Fields of one extra map style.
fn resolve_map_style(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .required("name", kinds::STRING)
        .required("icon", kinds::STRING)
        .required("spec", kinds::MAPPING_OR_STRING)
        .optional("fog", kinds::MAPPING))
}

// ============================================================================
// SECTION: Viewports
// ============================================================================

/// Contract for `maps.data.*.defaultViewport`.
pub static VIEWPORT: Contract =
    Contract::new("viewport", resolve_viewport).with_nested(viewport_nested);

/// Contract for `maps.data.*.optionalViewports.*`.
pub static OPTIONAL_VIEWPORT: Contract =
    Contract::new("optionalViewport", resolve_optional_viewport).with_nested(viewport_nested);

/// Camera position fields.
fn resolve_viewport(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .required("latitude", kinds::NUMBER)
        .required("longitude", kinds::NUMBER)
        .required("zoom", kinds::NUMBER)
        .optional("maxZoom", kinds::NUMBER)
        .optional("minZoom", kinds::NUMBER)
        .optional("height", kinds::NUMBER)
        .optional("altitude", kinds::NUMBER)
        .optional("bearing", kinds::NUMBER)
        .optional("pitch", kinds::NUMBER))
}

/// Selectable viewports also need a menu entry.
fn resolve_optional_viewport(node: &Node<'_>, ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(resolve_viewport(node, ctx)?
        .required("icon", kinds::STRING)
        .required("name", kinds::STRING))
}

/// Range checks the camera coordinates and zoom bounds.
fn viewport_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    _ctx: &Context,
) -> Result<(), NestedFailure> {
    for (field, axis) in
        [("latitude", Axis::Latitude), ("longitude", Axis::Longitude), ("altitude", Axis::Altitude)]
    {
        if let Some(value) = node.get(field).and_then(Value::as_f64) {
            tracker.report_at(field, check_coordinates(field, axis, &[value]));
        }
    }
    let number = |field: &str| node.get(field).and_then(Value::as_f64);
    if let (Some(min_zoom), Some(max_zoom)) = (number("minZoom"), number("maxZoom"))
        && min_zoom > max_zoom
    {
        tracker.error_at("minZoom", "`minZoom` must not be greater than `maxZoom`.");
    }
    Ok(())
}

// ============================================================================
// SECTION: Legend Groups
// ============================================================================

/// Contract for `maps.data.*.legendGroups.*`.
pub static LEGEND_GROUP: Contract =
    Contract::new("legendGroups", resolve_legend_group).with_nested(legend_group_nested);

/// Contract for `maps.data.*.legendGroups.*.data.*`.
pub static LEGEND_GROUP_DATA: Contract =
    Contract::new("legendGroups_data", resolve_legend_data).with_nested(legend_data_nested);

/// Fields of one legend group.
fn resolve_legend_group(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .required("name", kinds::STRING)
        .required("data", kinds::MAPPING))
}

/// Dispatches each feature entry of the group.
fn legend_group_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    dispatch_child(node, "data", &LEGEND_GROUP_DATA, tracker, ctx);
    Ok(())
}

/// Legend entry for one map feature; props are those of that feature.
fn resolve_legend_data(_node: &Node<'_>, ctx: &Context) -> Result<ContractShape, SpecError> {
    let feature_id = ctx.current_field_id().unwrap_or_default();
    let prop_ids = ctx.ids_for(keys::FEATURE_PROPS, feature_id);
    Ok(ContractShape::new()
        .optional("value", kinds::BOOLEAN)
        .optional("colorBy", kinds::STRING)
        .optional("sizeBy", kinds::STRING)
        .optional("colorByOptions", kinds::MAPPING)
        .optional("sizeByOptions", kinds::MAPPING)
        .optional("icon", kinds::STRING)
        .optional("color", kinds::STRING)
        .optional("size", kinds::STRING)
        .accepted("colorBy", prop_ids.to_vec())
        .accepted("sizeBy", prop_ids.to_vec())
        .accepted("colorByOptions", prop_ids.to_vec())
        .accepted("sizeByOptions", prop_ids.to_vec()))
}

/// Checks the feature reference, static styling, and per-prop options.
fn legend_data_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    if let Some(feature_id) = ctx.current_field_id() {
        let feature_ids: Vec<&str> = ctx
            .id_map(keys::FEATURE_PROPS)
            .map(|features| features.keys().map(String::as_str).collect())
            .unwrap_or_default();
        if !feature_ids.contains(&feature_id) {
            tracker.error(format!(
                "`{feature_id}` does not match any valid map feature ids {}",
                preview_list(&feature_ids, ACCEPTED_PREVIEW_LIMIT)
            ));
        }
    }
    if let Some(color) = node.str("color") {
        tracker.report_at("color", check_rgba(color));
    }
    if let Some(size) = node.str("size") {
        tracker.report_at("size", check_pixel(size));
    }
    dispatch_child(node, "colorByOptions", &COLOR_BY_OPTIONS, tracker, ctx);
    dispatch_child(node, "sizeByOptions", &SIZE_BY_OPTIONS, tracker, ctx);
    Ok(())
}
