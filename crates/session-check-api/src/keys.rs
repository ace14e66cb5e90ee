// crates/session-check-api/src/keys.rs
// ============================================================================
// Module: Domain Context Keys
// Description: Names of context entries shared between domain contracts.
// Purpose: Keep cross-reference and caller-parameter keys in one place.
// Dependencies: session-check-core
// ============================================================================

//! ## Overview
//! Cross-reference sets are written once by the root orchestration and read
//! by later sections. Caller parameters are set by a parent hook right
//! before it hands a child node to the engine.

// ============================================================================
// SECTION: Imports
// ============================================================================

use session_check_core::ContextKey;

// ============================================================================
// SECTION: Cross-Reference Sets
// ============================================================================

/// Pane ids declared under `panes.data`.
pub const VALID_PANE_IDS: ContextKey = ContextKey::new("validPaneIds");
/// Prop ids of each map feature, keyed by feature id.
pub const FEATURE_PROPS: ContextKey = ContextKey::new("featureProps");
/// Map ids declared under `maps.data`.
pub const VALID_MAP_IDS: ContextKey = ContextKey::new("validMapIds");
/// Prop ids declared under `globalOutputs.props`.
pub const VALID_GLOBAL_OUTPUT_IDS: ContextKey = ContextKey::new("validGlobalOutputIds");
/// Level ids of each grouping, keyed by grouping id.
pub const GROUPED_LEVEL_IDS: ContextKey = ContextKey::new("groupedLevelIds");
/// Stat ids of each grouped data set, keyed by data id.
pub const GROUPED_STAT_IDS: ContextKey = ContextKey::new("groupedStatIds");
/// Grouping ids referenced by each grouped data set, keyed by data id.
pub const GROUPED_GROUP_IDS: ContextKey = ContextKey::new("groupedGroupIds");
/// Page ids declared under `pages.data`.
pub const VALID_PAGE_IDS: ContextKey = ContextKey::new("validPageIds");

// ============================================================================
// SECTION: Caller Parameters
// ============================================================================

/// Prop ids of the enclosing props mapping.
pub const PROP_IDS: ContextKey = ContextKey::new("propIds");
/// The enclosing props mapping itself.
pub const PROPS_DATA: ContextKey = ContextKey::new("propsData");
/// Variant of the selector prop whose options are validated.
pub const OPTION_VARIANT: ContextKey = ContextKey::new("optionVariant");
/// Layer type of the enclosing map feature.
pub const LAYER_TYPE: ContextKey = ContextKey::new("layerType");
/// Whether the enclosing map feature declares a `geoJson` source.
pub const LAYER_HAS_GEO_JSON: ContextKey = ContextKey::new("layerHasGeoJson");
/// Grouping ids declared under `groupedOutputs.groupings`.
pub const GROUPING_IDS: ContextKey = ContextKey::new("groupingIds");
/// Level ids of the enclosing grouping.
pub const LEVEL_IDS: ContextKey = ContextKey::new("levelIds");
