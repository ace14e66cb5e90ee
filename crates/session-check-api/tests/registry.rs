// crates/session-check-api/tests/registry.rs
// ============================================================================
// Module: Contract Registry Tests
// Description: Tests for API path lookup and fragment validation.
// Purpose: Ensure every documented API path resolves to its contract.
// Dependencies: session-check-api, session-check-core, serde_json
// ============================================================================

//! ## Overview
//! Validates fragments directly against registered contracts, without a
//! surrounding session document.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions are permitted."
)]

mod common;

use std::collections::BTreeMap;

use common::error_lines;
use common::expect_error_at;
use common::expect_no_errors;
use serde_json::json;
use session_check_api::RegistryError;
use session_check_api::keys;
use session_check_api::registry;
use session_check_api::validate_fragment;
use session_check_api::validate_fragment_with;
use session_check_core::Context;
use session_check_core::context::keys::CURRENT_FIELD_ID;

type TestResult = Result<(), String>;

const NO_IGNORED: [&str; 0] = [];

// ============================================================================
// SECTION: Lookup
// ============================================================================

#[test]
fn every_documented_path_is_registered() -> TestResult {
    let documented = [
        "root",
        "extraKwargs",
        "settings",
        "settings.demo.*",
        "settings.sync.*",
        "settings.time",
        "settings.defaults",
        "appBar",
        "appBar.data.*",
        "panes",
        "panes.data.*",
        "pages",
        "pages.data.*",
        "pages.data.*.pageLayout.*",
        "maps",
        "maps.data.*",
        "maps.data.*.defaultViewport",
        "maps.data.*.optionalViewports.*",
        "maps.data.*.legendGroups.*",
        "maps.data.*.legendGroups.*.data.*",
        "maps.additionalMapStyles.*",
        "mapFeatures",
        "mapFeatures.data.*",
        "mapFeatures.data.*.data",
        "mapFeatures.data.*.data.location",
        "mapFeatures.data.*.geoJson",
        "globalOutputs",
        "groupedOutputs",
        "groupedOutputs.groupings.*",
        "groupedOutputs.groupings.*.levels.*",
        "groupedOutputs.data.*",
        "props.*",
        "props.*.options.*",
        "layout",
        "values",
        "valueLists",
        "colorByOptions.*",
        "sizeByOptions.*",
    ];
    let missing: Vec<&str> =
        documented.iter().copied().filter(|path| registry().get(path).is_none()).collect();
    if !missing.is_empty() {
        return Err(format!("unregistered paths {missing:?}"));
    }
    if registry().len() != documented.len() {
        return Err(format!("expected {} paths, got {}", documented.len(), registry().len()));
    }
    Ok(())
}

#[test]
fn iteration_is_sorted_by_path() -> TestResult {
    let paths: Vec<&str> = registry().paths().collect();
    let mut sorted = paths.clone();
    sorted.sort_unstable();
    if paths != sorted {
        return Err("registry paths must iterate in sorted order".to_string());
    }
    let names: Vec<&str> = registry().iter().map(|(_, contract)| contract.name()).collect();
    if names.len() != paths.len() || registry().is_empty() {
        return Err("iteration must cover every contract".to_string());
    }
    Ok(())
}

#[test]
fn lookup_returns_the_named_contract() -> TestResult {
    let contract = registry().get("maps.data.*").ok_or("maps.data.* is not registered")?;
    if contract.name() != "maps_data" {
        return Err(format!("unexpected contract {}", contract.name()));
    }
    Ok(())
}

#[test]
fn unknown_path_is_an_error() -> TestResult {
    match validate_fragment("maps.data.*.unknown", &json!({}), NO_IGNORED) {
        Err(RegistryError::UnknownPath {
            path,
        }) if path == "maps.data.*.unknown" => Ok(()),
        Err(err) => Err(format!("unexpected error {err}")),
        Ok(_) => Err("unknown path must not validate".to_string()),
    }
}

// ============================================================================
// SECTION: Fragments
// ============================================================================

#[test]
fn selector_prop_without_options_reports_options() -> TestResult {
    let log = validate_fragment("props.*", &json!({"name": "Pick", "type": "selector"}), NO_IGNORED)
        .map_err(|err| err.to_string())?;
    let errors = error_lines(&log);
    if errors != ["options: Error validating spec: Missing required fields: ['options']"] {
        return Err(format!("unexpected errors {errors:?}"));
    }
    Ok(())
}

#[test]
fn slider_prop_without_bounds_reports_both() -> TestResult {
    let prop = json!({"name": "Amount", "type": "num", "variant": "slider"});
    let log = validate_fragment("props.*", &prop, NO_IGNORED).map_err(|err| err.to_string())?;
    let errors = error_lines(&log);
    if errors
        != ["<root>: Error validating spec: Missing required fields: ['maxValue', 'minValue']"]
    {
        return Err(format!("unexpected errors {errors:?}"));
    }
    Ok(())
}

#[test]
fn gradient_options_check_rgba_channels() -> TestResult {
    let bad = json!({"startGradientColor": "rgba(999,0,0,1)", "endGradientColor": "rgba(0,0,0,0)"});
    let log =
        validate_fragment("colorByOptions.*", &bad, NO_IGNORED).map_err(|err| err.to_string())?;
    if log.error_count() != 1 {
        return Err(format!("expected one error, got {:?}", error_lines(&log)));
    }
    expect_error_at(&log, "startGradientColor", "rgba(999,0,0,1)")?;

    let good =
        json!({"startGradientColor": "rgba(10,20,30,1)", "endGradientColor": "rgba(0,0,0,0.5)"});
    let log =
        validate_fragment("colorByOptions.*", &good, NO_IGNORED).map_err(|err| err.to_string())?;
    expect_no_errors(&log)
}

#[test]
fn size_options_need_pixel_units() -> TestResult {
    let bad = json!({"startSize": "10", "endSize": "20px"});
    let log =
        validate_fragment("sizeByOptions.*", &bad, NO_IGNORED).map_err(|err| err.to_string())?;
    if log.error_count() != 1 {
        return Err(format!("expected one error, got {:?}", error_lines(&log)));
    }
    expect_error_at(&log, "startSize", "Invalid pixel string (10)")?;

    let good = json!({"startSize": "10px", "endSize": "20px"});
    let log =
        validate_fragment("sizeByOptions.*", &good, NO_IGNORED).map_err(|err| err.to_string())?;
    expect_no_errors(&log)
}

#[test]
fn supplied_context_resolves_references() -> TestResult {
    let feature_props =
        BTreeMap::from([("warehouse".to_string(), vec!["capacity".to_string()])]);
    let ctx = Context::new()
        .with_id_map(keys::FEATURE_PROPS, feature_props)
        .with_text(CURRENT_FIELD_ID, "warehouse");
    let entry = json!({"colorBy": "capacity", "sizeBy": "volume"});
    let log = validate_fragment_with("maps.data.*.legendGroups.*.data.*", &entry, &ctx)
        .map_err(|err| err.to_string())?;
    let errors = error_lines(&log);
    let expected =
        "sizeBy: Invalid value(s) selected: ['volume']. Accepted values are: ['capacity']";
    if errors != [expected] {
        return Err(format!("unexpected errors {errors:?}"));
    }
    Ok(())
}

#[test]
fn viewport_zoom_bounds_are_ordered() -> TestResult {
    let viewport = json!({"latitude": 0, "longitude": 0, "zoom": 4, "minZoom": 8, "maxZoom": 2});
    let log = validate_fragment("maps.data.*.defaultViewport", &viewport, NO_IGNORED)
        .map_err(|err| err.to_string())?;
    expect_error_at(&log, "minZoom", "`minZoom` must not be greater than `maxZoom`.")
}

#[test]
fn viewport_and_legend_group_order_is_reserved() -> TestResult {
    let viewport = json!({"latitude": 0, "longitude": 0, "zoom": 4, "order": "first"});
    let log = validate_fragment("maps.data.*.defaultViewport", &viewport, NO_IGNORED)
        .map_err(|err| err.to_string())?;
    if !log.is_empty() {
        return Err(format!("unexpected diagnostics {:?}", log.entries()));
    }
    let group = json!({"name": "Legend", "data": {}, "order": ["a"]});
    let log = validate_fragment("maps.data.*.legendGroups.*", &group, NO_IGNORED)
        .map_err(|err| err.to_string())?;
    if !log.is_empty() {
        return Err(format!("unexpected diagnostics {:?}", log.entries()));
    }
    Ok(())
}

#[test]
fn optional_viewports_need_a_menu_entry() -> TestResult {
    let viewport = json!({"latitude": 0, "longitude": 0, "zoom": 4});
    let log = validate_fragment("maps.data.*.optionalViewports.*", &viewport, NO_IGNORED)
        .map_err(|err| err.to_string())?;
    let errors = error_lines(&log);
    if errors != ["<root>: Error validating spec: Missing required fields: ['icon', 'name']"] {
        return Err(format!("unexpected errors {errors:?}"));
    }
    Ok(())
}

#[test]
fn arc_paths_are_checked_as_coordinate_paths() -> TestResult {
    let ctx = Context::new().with_text(keys::LAYER_TYPE, "arc");
    let location = json!({"path": [[[0, 0], [10, 95]]]});
    let log = validate_fragment_with("mapFeatures.data.*.data.location", &location, &ctx)
        .map_err(|err| err.to_string())?;
    expect_error_at(&log, "path", "has a latitude outside of the range")?;

    let location = json!({"path": [[[0, 0]]]});
    let log = validate_fragment_with("mapFeatures.data.*.data.location", &location, &ctx)
        .map_err(|err| err.to_string())?;
    expect_error_at(&log, "path", "must be a list of paths")
}

#[test]
fn map_styles_accept_any_string_or_inline_spec() -> TestResult {
    let inline = json!({"name": "Dark", "icon": "md/MdDarkMode", "spec": {"version": 8}});
    let log = validate_fragment("maps.additionalMapStyles.*", &inline, NO_IGNORED)
        .map_err(|err| err.to_string())?;
    expect_no_errors(&log)?;

    let hosted =
        json!({"name": "Dark", "icon": "md/MdDarkMode", "spec": "mapbox://styles/mapbox/dark-v11"});
    let log = validate_fragment("maps.additionalMapStyles.*", &hosted, NO_IGNORED)
        .map_err(|err| err.to_string())?;
    expect_no_errors(&log)?;

    let numeric = json!({"name": "Dark", "icon": "md/MdDarkMode", "spec": 8});
    let log = validate_fragment("maps.additionalMapStyles.*", &numeric, NO_IGNORED)
        .map_err(|err| err.to_string())?;
    expect_error_at(&log, "spec", "(spec) Invalid Type")
}

#[test]
fn null_optional_prop_fields_read_as_unset() -> TestResult {
    let prop = json!({
        "name": "Amount",
        "type": "num",
        "help": null,
        "unit": null,
        "variant": null
    });
    let log = validate_fragment("props.*", &prop, NO_IGNORED).map_err(|err| err.to_string())?;
    if !log.is_empty() {
        return Err(format!("unexpected diagnostics {:?}", log.entries()));
    }

    let prop = json!({"name": null, "type": "num"});
    let log = validate_fragment("props.*", &prop, NO_IGNORED).map_err(|err| err.to_string())?;
    expect_error_at(&log, "name", "Missing required fields: ['name']")
}

#[test]
fn extra_kwargs_accept_anything() -> TestResult {
    let kwargs = json!({"wipeExisting": true, "anything": {"nested": [1, 2]}});
    let log =
        validate_fragment("extraKwargs", &kwargs, NO_IGNORED).map_err(|err| err.to_string())?;
    if !log.is_empty() {
        return Err(format!("unexpected diagnostics {:?}", log.entries()));
    }
    Ok(())
}
