// crates/session-check-api/src/map_features.rs
// ============================================================================
// Module: Map Feature Contracts
// Description: Contracts for `mapFeatures` layers, their data, and locations.
// Purpose: Validate map layers and the coordinate lists behind them.
// Dependencies: session-check-core, serde_json
// ============================================================================

//! ## Overview
//! A map feature is a layer of `arc`, `node`, or `geo` items. Its `data`
//! holds column lists: `location` columns decided by the layer type and
//! `valueLists` columns keyed by the feature's props. Every column has one
//! entry per item, so all of them must have the same length.

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
use session_check_core::checks::Axis;
use session_check_core::checks::check_coordinate_paths;
use session_check_core::checks::check_coordinates;
use session_check_core::checks::check_list_kinds;
use session_check_core::checks::check_url;
use session_check_core::dispatch_child;
use session_check_core::engine::is_reserved;
use session_check_core::kinds;
use session_check_core::validate_child;

use crate::general::LAYOUT;
use crate::general::PROPS;
use crate::general::VALUE_LISTS;
use crate::general::with_props;
use crate::keys;

// ============================================================================
// SECTION: Accepted Values
// ============================================================================

/// Map layer types.
pub const LAYER_TYPES: [&str; 3] = ["arc", "node", "geo"];

// ============================================================================
// SECTION: Map Features
// ============================================================================

/// Contract for `mapFeatures`.
pub static MAP_FEATURES: Contract =
    Contract::new("mapFeatures", resolve_map_features).with_nested(map_features_nested);

/// Contract for `mapFeatures.data.*`.
pub static MAP_FEATURE: Contract =
    Contract::new("mapFeatures_data", resolve_map_feature).with_nested(map_feature_nested);

/// Map feature container fields.
fn resolve_map_features(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new().optional("data", kinds::MAPPING))
}

/// Dispatches every map feature.
fn map_features_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    dispatch_child(node, "data", &MAP_FEATURE, tracker, ctx);
    Ok(())
}

/// Fields of one layer; geo layers need a GeoJSON source.
fn resolve_map_feature(node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    let layer_type = node.str("type");
    Ok(ContractShape::new()
        .required("type", kinds::STRING)
        .required("name", kinds::STRING)
        .required("props", kinds::MAPPING)
        .required("data", kinds::MAPPING)
        .optional("layout", kinds::MAPPING)
        .when(matches!(layer_type, Some("geo" | "arc")), |shape| {
            shape.field("geoJson", kinds::MAPPING, layer_type == Some("geo"))
        })
        .accepted("type", LAYER_TYPES))
}

/// Validates props, then data, layout, and GeoJSON source against them.
fn map_feature_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    dispatch_child(node, "props", &PROPS, tracker, ctx);
    let props_ctx = with_props(ctx, node, "props");
    let layer_ctx = props_ctx
        .with_text(keys::LAYER_TYPE, node.str("type").unwrap_or_default())
        .with_flag(keys::LAYER_HAS_GEO_JSON, node.contains("geoJson"));
    validate_child(node, "data", &FEATURE_DATA, tracker, &layer_ctx);
    validate_child(node, "layout", &LAYOUT, tracker, &props_ctx);
    validate_child(node, "geoJson", &GEO_JSON, tracker, ctx);
    Ok(())
}

// ============================================================================
// SECTION: Feature Data
// ============================================================================

/// Contract for `mapFeatures.data.*.data`.
pub static FEATURE_DATA: Contract =
    Contract::new("mapFeatures_data_data", resolve_feature_data).with_nested(feature_data_nested);

/// Contract for `mapFeatures.data.*.data.location`.
pub static FEATURE_LOCATION: Contract =
    Contract::new("mapFeatures_data_data_location", resolve_location)
        .with_nested(location_nested);

/// Contract for `mapFeatures.data.*.geoJson`.
pub static GEO_JSON: Contract =
    Contract::new("mapFeatures_data_geoJson", resolve_geo_json).with_nested(geo_json_nested);

/// Column groups of a layer.
fn resolve_feature_data(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .required("location", kinds::MAPPING)
        .required("valueLists", kinds::MAPPING))
}

/// Validates both column groups and compares their lengths.
fn feature_data_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    validate_child(node, "valueLists", &VALUE_LISTS, tracker, ctx);
    validate_child(node, "location", &FEATURE_LOCATION, tracker, ctx);
    let mut lengths: Vec<usize> = Vec::new();
    for group in ["location", "valueLists"] {
        let Some(columns) = node.mapping(group)? else {
            continue;
        };
        let columns = node.child(columns);
        for (column, value) in columns.iter() {
            if let Value::Array(items) = value
                && !is_reserved(column)
            {
                lengths.push(items.len());
            }
        }
    }
    if lengths.windows(2).any(|pair| pair.first() != pair.last()) {
        tracker.error("location and valueLists keys must have the same length.");
    }
    Ok(())
}

/// Location columns required by the enclosing layer.
fn resolve_location(node: &Node<'_>, ctx: &Context) -> Result<ContractShape, SpecError> {
    let layer_type = ctx.text(keys::LAYER_TYPE);
    let has_geo_json = ctx.flag(keys::LAYER_HAS_GEO_JSON);
    let shape = ContractShape::new();
    let shape = match layer_type {
        Some("geo") => shape.required("geoJsonValue", kinds::SEQUENCE),
        Some("arc") if has_geo_json => shape.required("geoJsonValue", kinds::SEQUENCE),
        Some("arc") if node.contains("path") => shape.required("path", kinds::SEQUENCE),
        Some("arc") => shape
            .required("startLatitude", kinds::SEQUENCE)
            .required("startLongitude", kinds::SEQUENCE)
            .required("endLatitude", kinds::SEQUENCE)
            .required("endLongitude", kinds::SEQUENCE)
            .optional("startAltitude", kinds::SEQUENCE)
            .optional("endAltitude", kinds::SEQUENCE),
        _ => shape
            .required("latitude", kinds::SEQUENCE)
            .required("longitude", kinds::SEQUENCE)
            .optional("altitude", kinds::SEQUENCE),
    };
    Ok(shape)
}

/// Checks each location column by what its name says it holds.
fn location_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    _ctx: &Context,
) -> Result<(), NestedFailure> {
    for (column, value) in node.iter() {
        let Value::Array(items) = value else {
            continue;
        };
        if is_reserved(column) {
            continue;
        }
        if column == "path" {
            tracker.report_at(column, check_coordinate_paths(column, items));
        } else if column == "geoJsonValue" {
            tracker.report_at(column, check_list_kinds(items, kinds::STRING));
        } else if let Some(axis) = Axis::from_field(column) {
            if !tracker.report_at(column, check_list_kinds(items, kinds::NUMBER)) {
                continue;
            }
            let values: Vec<f64> = items.iter().filter_map(Value::as_f64).collect();
            tracker.report_at(column, check_coordinates(column, axis, &values));
        }
    }
    Ok(())
}

/// GeoJSON source of a layer.
fn resolve_geo_json(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .required("geoJsonLayer", kinds::STRING)
        .required("geoJsonProp", kinds::STRING))
}

/// The GeoJSON layer is fetched by URL.
fn geo_json_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    _ctx: &Context,
) -> Result<(), NestedFailure> {
    if let Some(url) = node.str("geoJsonLayer") {
        tracker.report_at("geoJsonLayer", check_url(url));
    }
    Ok(())
}
