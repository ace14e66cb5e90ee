// crates/session-check-api/src/grouped_outputs.rs
// ============================================================================
// Module: Grouped Output Contracts
// Description: Contracts for `groupedOutputs` groupings, levels, and data sets.
// Purpose: Validate the aggregated statistics that dashboard charts render.
// Dependencies: session-check-core, serde_json
// ============================================================================

//! ## Overview
//! A grouping (for example a location hierarchy) declares its levels and a
//! column table with one column per level plus an `id` column. A data set
//! declares stats as props, one value list per stat, and one group list per
//! grouping it is broken down by. Columns of one table share a length.

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
use session_check_core::checks::check_list_kinds;
use session_check_core::checks::check_rgba;
use session_check_core::dispatch_child;
use session_check_core::engine::is_reserved;
use session_check_core::kinds;
use session_check_core::validate_child;

use crate::general::PROPS;
use crate::general::VALUE_LISTS;
use crate::general::with_props;
use crate::keys;

// ============================================================================
// SECTION: Grouped Outputs
// ============================================================================

/// Contract for `groupedOutputs`.
pub static GROUPED_OUTPUTS: Contract =
    Contract::new("groupedOutputs", resolve_grouped_outputs).with_nested(grouped_outputs_nested);

/// Grouped output container fields.
fn resolve_grouped_outputs(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .optional("groupings", kinds::MAPPING)
        .optional("data", kinds::MAPPING))
}

/// Validates groupings first so data sets can reference them.
fn grouped_outputs_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    dispatch_child(node, "groupings", &GROUPING, tracker, ctx);
    let data_ctx = ctx.with_ids(keys::GROUPING_IDS, node.child_keys("groupings"));
    dispatch_child(node, "data", &GROUPED_DATA, tracker, &data_ctx);
    Ok(())
}

// ============================================================================
// SECTION: Groupings
// ============================================================================

/// Contract for `groupedOutputs.groupings.*`.
pub static GROUPING: Contract =
    Contract::new("groupedOutputs_groupings", resolve_grouping).with_nested(grouping_nested);

/// Contract for `groupedOutputs.groupings.*.levels.*`.
pub static GROUPING_LEVEL: Contract =
    Contract::new("groupedOutputs_groupings_levels", resolve_level).with_nested(level_nested);

/// Fields of one grouping; data columns are `id` plus one per level.
fn resolve_grouping(node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    let mut columns = vec!["id".to_string()];
    columns.extend(node.child_keys("levels"));
    Ok(ContractShape::new()
        .required("levels", kinds::MAPPING)
        .required("data", kinds::MAPPING)
        .optional("name", kinds::STRING)
        .optional("icon", kinds::STRING)
        .accepted("data", columns))
}

/// Validates levels and the grouping's column table.
fn grouping_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    let level_ctx = ctx.with_ids(keys::LEVEL_IDS, node.child_keys("levels"));
    dispatch_child(node, "levels", &GROUPING_LEVEL, tracker, &level_ctx);
    if let Some(columns) = node.mapping("data")? {
        check_columns(&node.child(columns), &mut tracker.nested("data"));
    }
    Ok(())
}

/// Fields of one level; `parent` names a sibling level.
fn resolve_level(_node: &Node<'_>, ctx: &Context) -> Result<ContractShape, SpecError> {
    let current = ctx.current_field_id();
    let siblings: Vec<String> = ctx
        .ids(keys::LEVEL_IDS)
        .iter()
        .filter(|level| Some(level.as_str()) != current)
        .cloned()
        .collect();
    Ok(ContractShape::new()
        .required("name", kinds::STRING)
        .optional("parent", kinds::STRING)
        .optional("ordering", kinds::SEQUENCE)
        .optional("orderWithParent", kinds::BOOLEAN)
        .optional("coloring", kinds::MAPPING)
        .accepted("parent", siblings))
}

/// Level colors must be RGBA strings.
fn level_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    _ctx: &Context,
) -> Result<(), NestedFailure> {
    let Some(coloring) = node.mapping("coloring")? else {
        return Ok(());
    };
    let mut coloring_tracker = tracker.nested("coloring");
    for (member, color) in node.child(coloring).iter() {
        match color.as_str() {
            Some(color) => {
                coloring_tracker.report_at(member, check_rgba(color));
            }
            None => {
                coloring_tracker.error_at(member, format!("`{member}` must be an RGBA string."));
            }
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Grouped Data
// ============================================================================

/// Contract for `groupedOutputs.data.*`.
pub static GROUPED_DATA: Contract =
    Contract::new("groupedOutputs_data", resolve_grouped_data).with_nested(grouped_data_nested);

/// Fields of one data set; group lists reference declared groupings.
fn resolve_grouped_data(_node: &Node<'_>, ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .required("stats", kinds::MAPPING)
        .required("valueLists", kinds::MAPPING)
        .required("groupLists", kinds::MAPPING)
        .accepted("groupLists", ctx.ids(keys::GROUPING_IDS).to_vec()))
}

/// Validates stats as props, value lists against them, and column lengths.
fn grouped_data_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    dispatch_child(node, "stats", &PROPS, tracker, ctx);
    let stats_ctx = with_props(ctx, node, "stats");
    validate_child(node, "valueLists", &VALUE_LISTS, tracker, &stats_ctx);
    if let Some(group_lists) = node.mapping("groupLists")? {
        let mut group_tracker = tracker.nested("groupLists");
        for (grouping, value) in node.child(group_lists).iter() {
            match value {
                Value::Array(items) => {
                    group_tracker.report_at(grouping, check_list_kinds(items, kinds::SCALAR));
                }
                _ => group_tracker
                    .error_at(grouping, format!("`{grouping}` must be a list of group ids.")),
            }
        }
    }
    let mut lengths = Vec::new();
    for group in ["valueLists", "groupLists"] {
        if let Some(columns) = node.mapping(group)? {
            lengths.extend(column_lengths(&node.child(columns)));
        }
    }
    if !all_equal(&lengths) {
        tracker.error("valueLists and groupLists keys must have the same length.");
    }
    Ok(())
}

// ============================================================================
// SECTION: Column Tables
// ============================================================================

/// Requires every column to be a list and all lists to share a length.
fn check_columns(columns: &Node<'_>, tracker: &mut PathTracker<'_>) {
    for (column, value) in columns.iter() {
        if !value.is_array() {
            tracker.error_at(column, format!("`{column}` must be a list."));
        }
    }
    if !all_equal(&column_lengths(columns)) {
        tracker.error("All lists in `data` must have the same length.");
    }
}

/// Lengths of the list columns of a table, reserved columns excluded.
fn column_lengths(columns: &Node<'_>) -> Vec<usize> {
    columns
        .iter()
        .filter(|(column, _)| !is_reserved(column))
        .filter_map(|(_, value)| value.as_array().map(Vec::len))
        .collect()
}

/// Returns true when all lengths are the same.
fn all_equal(lengths: &[usize]) -> bool {
    lengths.windows(2).all(|pair| pair.first() == pair.last())
}
