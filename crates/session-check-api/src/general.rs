// crates/session-check-api/src/general.rs
// ============================================================================
// Module: Shared Contracts
// Description: Props, layouts, values, and legend option contracts.
// Purpose: Contracts reused by panes, global outputs, map features, and maps.
// Dependencies: session-check-core, serde_json
// ============================================================================

//! ## Overview
//! Props describe the inputs and outputs of a pane, global output, or map
//! feature. The prop `type` and `variant` decide which other fields are
//! allowed or required. Layouts place props on a grid, and `values` /
//! `valueLists` carry the data for each prop.
//!
//! Parent hooks pass the enclosing props to these contracts through
//! [`with_props`], so a value can be checked against the prop it belongs to.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use session_check_core::Context;
use session_check_core::Contract;
use session_check_core::ContractShape;
use session_check_core::FieldKind;
use session_check_core::NestedFailure;
use session_check_core::Node;
use session_check_core::PathTracker;
use session_check_core::SpecError;
use session_check_core::checks::ACCEPTED_PREVIEW_LIMIT;
use session_check_core::checks::DateVariant;
use session_check_core::checks::check_date;
use session_check_core::checks::check_kind;
use session_check_core::checks::check_list_kinds;
use session_check_core::checks::check_pixel;
use session_check_core::checks::check_rgba;
use session_check_core::checks::check_subset;
use session_check_core::checks::check_url;
use session_check_core::checks::scalar_text;
use session_check_core::contract::open_shape;
use session_check_core::diagnostics::preview_list;
use session_check_core::dispatch_child;
use session_check_core::engine::is_reserved;
use session_check_core::kinds;

use crate::keys;

// ============================================================================
// SECTION: Accepted Values
// ============================================================================

/// Prop types understood by the client.
pub const PROP_TYPES: [&str; 8] =
    ["head", "num", "toggle", "button", "text", "selector", "date", "media"];

/// Placements of a unit relative to its value.
pub const UNIT_PLACEMENTS: [&str; 4] = ["after", "afterWithSpace", "before", "beforeWithSpace"];

/// Number notations for `notation` and `legendNotation`.
pub const NUMBER_NOTATIONS: [&str; 4] = ["compact", "precision", "scientific", "engineering"];

/// Layout types.
pub const LAYOUT_TYPES: [&str; 2] = ["grid", "item"];

/// Variants allowed for each prop type.
fn prop_variants(prop_type: Option<&str>) -> &'static [&'static str] {
    match prop_type {
        Some("head") => &["column", "row", "icon", "iconRow"],
        Some("text") => &["textarea"],
        Some("num") => &["field", "slider", "icon", "iconCompact"],
        Some("selector") => &[
            "dropdown", "checkbox", "radio", "combobox", "hstepper", "vstepper", "hradio", "nested",
        ],
        Some("date") => &["date", "time", "datetime"],
        Some("media") => &["picture", "video"],
        _ => &[],
    }
}

/// Display options allowed for a notation.
fn notation_displays(notation: &str) -> &'static [&'static str] {
    match notation {
        "compact" => &["short", "long"],
        "scientific" | "engineering" => &["e", "e+", "E", "E+", "x10^", "x10^+"],
        _ => &[],
    }
}

/// Picker views allowed for a date variant.
fn date_views(variant: &str) -> &'static [&'static str] {
    match variant {
        "date" => &["year", "month", "day"],
        "time" => &["hours", "minutes", "seconds"],
        "datetime" => &["year", "month", "day", "hours", "minutes", "seconds"],
        _ => &[],
    }
}

// ============================================================================
// SECTION: Context Helpers
// ============================================================================

/// Returns a snapshot carrying `node[field]` as the enclosing props.
///
/// Both the prop ids and the props mapping itself are exposed so layouts can
/// check `itemId` and values can check each entry against its prop.
#[must_use]
pub fn with_props(ctx: &Context, node: &Node<'_>, field: &str) -> Context {
    let props = node.get(field).cloned().unwrap_or_else(|| Value::Object(Map::new()));
    ctx.with_ids(keys::PROP_IDS, node.child_keys(field)).with_node(keys::PROPS_DATA, props)
}

// ============================================================================
// SECTION: Props
// ============================================================================

/// Contract for `props.*`.
pub static PROPS: Contract = Contract::new("props", resolve_props).with_nested(props_nested);

/// Contract for `props.*.options.*`.
pub static PROP_OPTIONS: Contract =
    Contract::new("props_options", resolve_prop_options).with_nested(prop_options_nested);

/// Decision table for one prop.
fn resolve_props(node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    let prop_type = node.str("type");
    let variant = node.str("variant");
    let notation = node.str("notation").unwrap_or("standard");
    let legend_notation = node.str("legendNotation").unwrap_or("standard");
    let is_num = prop_type == Some("num");
    let is_slider = is_num && variant == Some("slider");
    let shape = ContractShape::new()
        .required("name", kinds::STRING)
        .required("type", kinds::STRING)
        .optional("help", kinds::STRING)
        .optional("variant", kinds::STRING)
        .optional("display", kinds::BOOLEAN)
        .when(prop_type != Some("head"), |shape| {
            shape
                .optional("enabled", kinds::BOOLEAN)
                .optional("apiCommand", kinds::STRING)
                .optional("apiCommandKeys", kinds::SEQUENCE)
                .optional("allowNone", kinds::BOOLEAN)
        })
        .when(prop_type == Some("head") && matches!(variant, Some("icon" | "iconRow")), |shape| {
            shape.required("icon", kinds::STRING)
        })
        .when(prop_type == Some("text"), |shape| {
            shape
                .optional("minRows", kinds::INTEGER)
                .optional("maxRows", kinds::INTEGER)
                .optional("rows", kinds::INTEGER)
        })
        .when(is_num, |shape| {
            shape
                .field("maxValue", kinds::NUMBER, is_slider)
                .field("minValue", kinds::NUMBER, is_slider)
                .when(matches!(variant, Some("icon" | "iconCompact")), |shape| {
                    shape.required("icon", kinds::STRING)
                })
                .optional("unit", kinds::STRING)
                .optional("notation", kinds::STRING)
                .optional("precision", kinds::INTEGER)
                .optional("notationDisplay", kinds::STRING)
                .optional("legendNotation", kinds::STRING)
                .optional("legendPrecision", kinds::INTEGER)
                .optional("legendNotationDisplay", kinds::STRING)
                .optional("legendMinLabel", kinds::STRING)
                .optional("legendMaxLabel", kinds::STRING)
                .optional("trailingZeros", kinds::BOOLEAN)
                .optional("unitPlacement", kinds::STRING)
                .optional("draggable", kinds::BOOLEAN)
        })
        .when(prop_type == Some("selector"), |shape| {
            shape.required("options", kinds::MAPPING).optional("placeholder", kinds::STRING)
        })
        .when(prop_type == Some("date"), |shape| shape.optional("views", kinds::SEQUENCE))
        .accepted("type", PROP_TYPES)
        .accepted("variant", prop_variants(prop_type).iter().copied())
        .accepted("views", date_views(variant.unwrap_or("date")).iter().copied())
        .accepted("unitPlacement", UNIT_PLACEMENTS)
        .accepted("notation", NUMBER_NOTATIONS)
        .accepted("notationDisplay", notation_displays(notation).iter().copied())
        .accepted("legendNotation", NUMBER_NOTATIONS)
        .accepted("legendNotationDisplay", notation_displays(legend_notation).iter().copied());
    Ok(shape)
}

/// Checks command keys and dispatches selector options.
fn props_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    if let Some(Value::Array(command_keys)) = node.get("apiCommandKeys") {
        tracker.report_at("apiCommandKeys", check_list_kinds(command_keys, kinds::STRING));
    }
    if node.str("type") == Some("selector") {
        let option_ctx =
            ctx.with_text(keys::OPTION_VARIANT, node.str("variant").unwrap_or_default());
        dispatch_child(node, "options", &PROP_OPTIONS, tracker, &option_ctx);
    }
    Ok(())
}

/// Selector options; nested selectors locate each option by `path`.
fn resolve_prop_options(_node: &Node<'_>, ctx: &Context) -> Result<ContractShape, SpecError> {
    let nested = ctx.text(keys::OPTION_VARIANT) == Some("nested");
    Ok(ContractShape::new()
        .required("name", kinds::STRING)
        .field("path", kinds::SEQUENCE, nested))
}

/// Checks that nested option paths only hold strings.
fn prop_options_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    _ctx: &Context,
) -> Result<(), NestedFailure> {
    if let Some(Value::Array(path)) = node.get("path") {
        tracker.report_at("path", check_list_kinds(path, kinds::STRING));
    }
    Ok(())
}

// ============================================================================
// SECTION: Layout
// ============================================================================

/// Contract for `layout` and every nested grid cell.
pub static LAYOUT: Contract = Contract::new("layout", resolve_layout).with_nested(layout_nested);

/// Decision table for one layout node.
fn resolve_layout(node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    let layout_type = node.str("type");
    let shape = ContractShape::new()
        .required("type", kinds::STRING)
        .when(layout_type == Some("grid"), |shape| {
            shape
                .required("data", kinds::MAPPING)
                .optional("numColumns", kinds::STRING_OR_INTEGER)
                .optional("numRows", kinds::STRING_OR_INTEGER)
        })
        .when(layout_type == Some("item"), |shape| shape.required("itemId", kinds::STRING))
        .optional("column", kinds::INTEGER)
        .optional("row", kinds::INTEGER)
        .accepted("type", LAYOUT_TYPES)
        .when(node.str("numColumns").is_some(), |shape| shape.accepted("numColumns", ["auto"]))
        .when(node.str("numRows").is_some(), |shape| shape.accepted("numRows", ["auto"]));
    Ok(shape)
}

/// Recurses into grid cells and checks item references.
fn layout_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    match node.str("type") {
        Some("grid") => dispatch_child(node, "data", &LAYOUT, tracker, ctx),
        Some("item") => {
            let prop_ids = ctx.ids(keys::PROP_IDS);
            if let Some(item_id) = node.str("itemId")
                && !prop_ids.iter().any(|prop_id| prop_id == item_id)
            {
                tracker.error_at(
                    "itemId",
                    format!(
                        "`itemId` ({item_id}) does not match any valid prop ids {}",
                        preview_list(prop_ids, ACCEPTED_PREVIEW_LIMIT)
                    ),
                );
            }
        }
        _ => {}
    }
    Ok(())
}

// ============================================================================
// SECTION: Values
// ============================================================================

/// Contract for `values`: one value per prop id.
pub static VALUES: Contract = Contract::new("values", open_shape).with_nested(values_nested);

/// Contract for `valueLists`: one list of values per prop id.
pub static VALUE_LISTS: Contract =
    Contract::new("valueLists", open_shape).with_nested(value_lists_nested);

/// Value kinds of a numeric prop.
const NUMBER_VALUES: &[FieldKind] = &[FieldKind::Number];
/// Value kinds of a nullable numeric prop.
const NULLABLE_NUMBER_VALUES: &[FieldKind] = &[FieldKind::Number, FieldKind::Null];
/// Value kinds of a toggle prop.
const BOOLEAN_VALUES: &[FieldKind] = &[FieldKind::Boolean];
/// Value kinds of a nullable toggle prop.
const NULLABLE_BOOLEAN_VALUES: &[FieldKind] = &[FieldKind::Boolean, FieldKind::Null];
/// Value kinds of text-like props.
const STRING_VALUES: &[FieldKind] = &[FieldKind::String];
/// Value kinds of nullable text-like props.
const NULLABLE_STRING_VALUES: &[FieldKind] = &[FieldKind::String, FieldKind::Null];
/// Value kinds of a selector prop.
const SELECTION_VALUES: &[FieldKind] = &[FieldKind::Sequence];
/// Value kinds of a nullable selector prop.
const NULLABLE_SELECTION_VALUES: &[FieldKind] = &[FieldKind::Sequence, FieldKind::Null];
/// Value kinds of a prop with an unknown type.
const NULL_VALUES: &[FieldKind] = &[FieldKind::Null];

/// The parts of a prop definition that constrain its values.
struct PropTarget<'a> {
    /// Prop type.
    prop_type: Option<&'a str>,
    /// Prop variant.
    variant: Option<&'a str>,
    /// Whether `null` is admitted.
    allow_none: bool,
    /// Lower numeric bound.
    min_value: Option<f64>,
    /// Upper numeric bound.
    max_value: Option<f64>,
    /// Option ids of a selector.
    options: Vec<String>,
}

impl PropTarget<'_> {
    /// Kinds a single value of this prop may take.
    fn value_kinds(&self) -> &'static [FieldKind] {
        match (self.prop_type, self.allow_none) {
            (Some("num"), false) => NUMBER_VALUES,
            (Some("num"), true) => NULLABLE_NUMBER_VALUES,
            (Some("toggle"), false) => BOOLEAN_VALUES,
            (Some("toggle"), true) => NULLABLE_BOOLEAN_VALUES,
            (Some("button" | "text" | "date" | "media"), false) => STRING_VALUES,
            (Some("button" | "text" | "date" | "media"), true) => NULLABLE_STRING_VALUES,
            (Some("selector"), false) => SELECTION_VALUES,
            (Some("selector"), true) => NULLABLE_SELECTION_VALUES,
            (_, false) => &[],
            (_, true) => NULL_VALUES,
        }
    }

    /// Date format of this prop's values.
    fn date_variant(&self) -> DateVariant {
        DateVariant::from_variant(self.variant)
    }
}

/// Looks up the prop a value belongs to, reporting unknown and `head` props.
fn prop_target<'a>(
    props: Option<&'a Map<String, Value>>,
    prop_id: &str,
    tracker: &mut PathTracker<'_>,
) -> Option<PropTarget<'a>> {
    let definition = props
        .and_then(|props| props.get(prop_id))
        .and_then(Value::as_object)
        .filter(|definition| !definition.is_empty());
    let Some(definition) = definition else {
        let prop_ids: Vec<&str> =
            props.map(|props| props.keys().map(String::as_str).collect()).unwrap_or_default();
        tracker.error_at(
            prop_id,
            format!(
                "`{prop_id}` does not match any valid prop ids {}",
                preview_list(&prop_ids, ACCEPTED_PREVIEW_LIMIT)
            ),
        );
        return None;
    };
    let prop_type = definition.get("type").and_then(Value::as_str);
    if prop_type == Some("head") {
        tracker.error_at(
            prop_id,
            format!("`{prop_id}` with the prop type of `head` can not have an associated value."),
        );
        return None;
    }
    Some(PropTarget {
        prop_type,
        variant: definition.get("variant").and_then(Value::as_str),
        allow_none: definition.get("allowNone").and_then(Value::as_bool).unwrap_or(false),
        min_value: definition.get("minValue").and_then(Value::as_f64),
        max_value: definition.get("maxValue").and_then(Value::as_f64),
        options: definition
            .get("options")
            .and_then(Value::as_object)
            .map(|options| options.keys().cloned().collect())
            .unwrap_or_default(),
    })
}

/// Checks each value against its prop.
fn values_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    let props = ctx.node(keys::PROPS_DATA).and_then(Value::as_object);
    for (prop_id, value) in node.iter() {
        if is_reserved(prop_id) {
            continue;
        }
        let Some(target) = prop_target(props, prop_id, tracker) else {
            continue;
        };
        if !tracker.report_at(prop_id, check_kind(prop_id, value, target.value_kinds())) {
            continue;
        }
        check_single_value(prop_id, value, &target, tracker);
    }
    Ok(())
}

/// Runs the type-specific check for one non-list value.
fn check_single_value(
    prop_id: &str,
    value: &Value,
    target: &PropTarget<'_>,
    tracker: &mut PathTracker<'_>,
) {
    match (target.prop_type, value) {
        (Some("num"), Value::Number(number)) => {
            let Some(number) = number.as_f64() else {
                return;
            };
            let min_value = target.min_value.unwrap_or(f64::NEG_INFINITY);
            let max_value = target.max_value.unwrap_or(f64::INFINITY);
            if number < min_value || number > max_value {
                tracker.error_at(
                    prop_id,
                    format!(
                        "`{prop_id}` with the prop type of `num` must be between {min_value} and \
                         {max_value} as defined by the API spec."
                    ),
                );
            }
        }
        (Some("selector"), Value::Array(selected)) => {
            let selected: Vec<String> = selected.iter().map(scalar_text).collect();
            tracker.report_at(prop_id, check_subset(&selected, &target.options));
        }
        (Some("date"), Value::String(text)) => {
            tracker.report_at(prop_id, check_date(text, target.date_variant()));
        }
        (Some("media"), Value::String(text)) => {
            tracker.report_at(prop_id, check_url(text));
        }
        _ => {}
    }
}

/// Checks each value list against its prop.
fn value_lists_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    let props = ctx.node(keys::PROPS_DATA).and_then(Value::as_object);
    for (prop_id, value) in node.iter() {
        if is_reserved(prop_id) {
            continue;
        }
        let Value::Array(items) = value else {
            tracker
                .error_at(prop_id, format!("`{prop_id}` must be a list of values for valueLists"));
            continue;
        };
        let Some(target) = prop_target(props, prop_id, tracker) else {
            continue;
        };
        if !tracker.report_at(prop_id, check_list_kinds(items, target.value_kinds())) {
            continue;
        }
        let present: Vec<&Value> = items.iter().filter(|item| !item.is_null()).collect();
        check_value_list(prop_id, &present, &target, tracker);
    }
    Ok(())
}

/// Runs the type-specific check for the non-null items of one value list.
///
/// Date and URL checks stop at the first failing item.
fn check_value_list(
    prop_id: &str,
    items: &[&Value],
    target: &PropTarget<'_>,
    tracker: &mut PathTracker<'_>,
) {
    match target.prop_type {
        Some("num") => {
            let numbers: Vec<f64> = items.iter().filter_map(|item| item.as_f64()).collect();
            if let Some(min_value) = target.min_value
                && numbers.iter().any(|number| *number < min_value)
            {
                tracker.error_at(
                    prop_id,
                    format!(
                        "`{prop_id}` has a value that is less than {min_value} as defined by the \
                         API spec."
                    ),
                );
            }
            if let Some(max_value) = target.max_value
                && numbers.iter().any(|number| *number > max_value)
            {
                tracker.error_at(
                    prop_id,
                    format!(
                        "`{prop_id}` has a value that is greater than {max_value} as defined by \
                         the API spec."
                    ),
                );
            }
        }
        Some("selector") => {
            let mut selected: Vec<String> = Vec::new();
            for item in items {
                let Value::Array(choices) = item else {
                    continue;
                };
                for choice in choices {
                    let text = scalar_text(choice);
                    if !selected.contains(&text) {
                        selected.push(text);
                    }
                }
            }
            tracker.report_at(prop_id, check_subset(&selected, &target.options));
        }
        Some("date") => {
            let variant = target.date_variant();
            for text in items.iter().filter_map(|item| item.as_str()) {
                if !tracker.report_at(prop_id, check_date(text, variant)) {
                    break;
                }
            }
        }
        Some("media") => {
            for text in items.iter().filter_map(|item| item.as_str()) {
                if !tracker.report_at(prop_id, check_url(text)) {
                    break;
                }
            }
        }
        _ => {}
    }
}

// ============================================================================
// SECTION: Legend Options
// ============================================================================

/// Contract for `colorByOptions.*`.
pub static COLOR_BY_OPTIONS: Contract =
    Contract::new("colorByOptions", resolve_color_by_options).with_nested(color_by_nested);

/// Contract for `sizeByOptions.*`.
pub static SIZE_BY_OPTIONS: Contract =
    Contract::new("sizeByOptions", resolve_size_by_options).with_nested(size_by_nested);

/// Gradient colors used to render a numeric prop.
fn resolve_color_by_options(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .optional("min", kinds::NUMBER)
        .optional("max", kinds::NUMBER)
        .required("startGradientColor", kinds::STRING)
        .required("endGradientColor", kinds::STRING)
        .optional("nullColor", kinds::STRING))
}

/// Checks every color of a gradient.
fn color_by_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    _ctx: &Context,
) -> Result<(), NestedFailure> {
    for field in ["startGradientColor", "endGradientColor", "nullColor"] {
        if let Some(color) = node.str(field) {
            tracker.report_at(field, check_rgba(color));
        }
    }
    Ok(())
}

/// Pixel sizes used to render a numeric prop.
fn resolve_size_by_options(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .optional("min", kinds::NUMBER)
        .optional("max", kinds::NUMBER)
        .required("startSize", kinds::STRING)
        .required("endSize", kinds::STRING)
        .optional("nullSize", kinds::STRING))
}

/// Checks every size of a size range.
fn size_by_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    _ctx: &Context,
) -> Result<(), NestedFailure> {
    for field in ["startSize", "endSize", "nullSize"] {
        if let Some(size) = node.str(field) {
            tracker.report_at(field, check_pixel(size));
        }
    }
    Ok(())
}
