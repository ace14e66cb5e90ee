// crates/session-check-api/src/pages.rs
// ============================================================================
// Module: Page Contracts
// Description: Contracts for `pages`, `pages.data.*`, and page layout items.
// Purpose: Validate dashboard pages and the charts and maps they reference.
// Dependencies: session-check-core
// ============================================================================

//! ## Overview
//! A page is a sequence of layout items. Each item points at something
//! declared elsewhere in the document: a map id, global output prop ids, or
//! a grouped output data set with its stats, groupings, and levels. Pages
//! are validated after maps, global outputs, and grouped outputs so every
//! referenced id set is already in the context; the references are expressed
//! as accepted values and checked by the engine.

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
use session_check_core::checks::selection_of;
use session_check_core::dispatch_child;
use session_check_core::kinds;
use session_check_core::validate_sequence;

use crate::keys;

// ============================================================================
// SECTION: Accepted Values
// ============================================================================

/// Layout item types.
pub const PAGE_LAYOUT_TYPES: [&str; 3] = ["map", "globalOutput", "groupedOutput"];

// ============================================================================
// SECTION: Pages
// ============================================================================

/// Contract for `pages`.
pub static PAGES: Contract = Contract::new("pages", resolve_pages).with_nested(pages_nested);

/// Contract for `pages.data.*`.
pub static PAGE: Contract = Contract::new("pages_data", resolve_page).with_nested(page_nested);

/// Contract for `pages.data.*.pageLayout.*`.
pub static PAGE_LAYOUT_ITEM: Contract = Contract::new("pages_data_pageLayout", resolve_layout_item);

/// Page container fields; `currentPage` must name a declared page.
fn resolve_pages(node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .optional("currentPage", kinds::STRING)
        .optional("data", kinds::MAPPING)
        .accepted("currentPage", node.child_keys("data")))
}

/// Dispatches every page.
fn pages_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    dispatch_child(node, "data", &PAGE, tracker, ctx);
    Ok(())
}

/// Fields of one page.
fn resolve_page(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .required("pageLayout", kinds::SEQUENCE)
        .optional("lockedLayout", kinds::BOOLEAN))
}

/// Validates each layout item by position.
fn page_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    if let Some(items) = node.sequence("pageLayout")? {
        validate_sequence(items, &PAGE_LAYOUT_ITEM, &mut tracker.nested("pageLayout"), ctx);
    }
    Ok(())
}

// ============================================================================
// SECTION: Layout Items
// ============================================================================

/// Decision table for one layout item, with references as accepted values.
fn resolve_layout_item(node: &Node<'_>, ctx: &Context) -> Result<ContractShape, SpecError> {
    let shape = ContractShape::new()
        .required("type", kinds::STRING)
        .optional("variant", kinds::STRING)
        .optional("showToolbar", kinds::BOOLEAN)
        .optional("maximized", kinds::BOOLEAN)
        .accepted("type", PAGE_LAYOUT_TYPES);
    let shape = match node.str("type") {
        Some("map") => shape
            .required("mapId", kinds::STRING)
            .accepted("mapId", ctx.ids(keys::VALID_MAP_IDS).to_vec()),
        Some("globalOutput") => shape
            .required("globalOutputId", kinds::STRING_OR_SEQUENCE)
            .accepted("globalOutputId", ctx.ids(keys::VALID_GLOBAL_OUTPUT_IDS).to_vec()),
        Some("groupedOutput") => grouped_output_item(node, ctx, shape),
        _ => shape,
    };
    Ok(shape)
}

/// Extends `shape` with the grouped output references of one item.
///
/// Stats and groupings are scoped to the selected data set, and levels to
/// the selected groupings.
fn grouped_output_item(node: &Node<'_>, ctx: &Context, shape: ContractShape) -> ContractShape {
    let data_ids: Vec<String> = ctx
        .id_map(keys::GROUPED_STAT_IDS)
        .map(|stats| stats.keys().cloned().collect())
        .unwrap_or_default();
    let data_id = node.str("groupedOutputDataId").unwrap_or_default();
    let groupings = node.get("groupingId").and_then(selection_of).unwrap_or_default();
    let mut levels: Vec<String> = Vec::new();
    for grouping in &groupings {
        for level in ctx.ids_for(keys::GROUPED_LEVEL_IDS, grouping) {
            if !levels.contains(level) {
                levels.push(level.clone());
            }
        }
    }
    shape
        .required("groupedOutputDataId", kinds::STRING)
        .required("statId", kinds::STRING_OR_SEQUENCE)
        .optional("groupingId", kinds::STRING_OR_SEQUENCE)
        .optional("groupingLevel", kinds::STRING_OR_SEQUENCE)
        .optional("chartType", kinds::STRING)
        .accepted("groupedOutputDataId", data_ids)
        .accepted("statId", ctx.ids_for(keys::GROUPED_STAT_IDS, data_id).to_vec())
        .accepted("groupingId", ctx.ids_for(keys::GROUPED_GROUP_IDS, data_id).to_vec())
        .accepted("groupingLevel", levels)
}
