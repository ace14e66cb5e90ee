// crates/session-check-api/src/registry.rs
// ============================================================================
// Module: Contract Registry
// Description: Lookup of every domain contract by its API path.
// Purpose: Validate sub-documents against any registered API path.
// Dependencies: session-check-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! API paths use `.` between keys and `*` for a custom-key level, for
//! example `maps.data.*.legendGroups.*`. A wildcard path names one entry of
//! its container, so a fragment validated at `panes.data.*` is a single pane.
//!
//! Fragment diagnostics are relative: paths start at the fragment itself.
//! Cross-reference ids are empty unless supplied through
//! [`validate_fragment_with`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde_json::Value;
use session_check_core::Context;
use session_check_core::Contract;
use session_check_core::ValidationLog;
use session_check_core::validate_at;
use thiserror::Error;

use crate::app_bar::APP_BAR;
use crate::app_bar::APP_BAR_DATA;
use crate::extra_kwargs::EXTRA_KWARGS;
use crate::general::COLOR_BY_OPTIONS;
use crate::general::LAYOUT;
use crate::general::PROP_OPTIONS;
use crate::general::PROPS;
use crate::general::SIZE_BY_OPTIONS;
use crate::general::VALUE_LISTS;
use crate::general::VALUES;
use crate::global_outputs::GLOBAL_OUTPUTS;
use crate::grouped_outputs::GROUPED_DATA;
use crate::grouped_outputs::GROUPED_OUTPUTS;
use crate::grouped_outputs::GROUPING;
use crate::grouped_outputs::GROUPING_LEVEL;
use crate::map_features::FEATURE_DATA;
use crate::map_features::FEATURE_LOCATION;
use crate::map_features::GEO_JSON;
use crate::map_features::MAP_FEATURE;
use crate::map_features::MAP_FEATURES;
use crate::maps::LEGEND_GROUP;
use crate::maps::LEGEND_GROUP_DATA;
use crate::maps::MAP;
use crate::maps::MAP_STYLE;
use crate::maps::MAPS;
use crate::maps::OPTIONAL_VIEWPORT;
use crate::maps::VIEWPORT;
use crate::pages::PAGE;
use crate::pages::PAGE_LAYOUT_ITEM;
use crate::pages::PAGES;
use crate::panes::PANE;
use crate::panes::PANES;
use crate::root::ROOT;
use crate::settings::SETTINGS;
use crate::settings::SETTINGS_DEFAULTS;
use crate::settings::SETTINGS_DEMO;
use crate::settings::SETTINGS_SYNC;
use crate::settings::SETTINGS_TIME;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registry lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No contract is registered for the API path.
    #[error("unknown API path: {path}")]
    UnknownPath {
        /// Requested API path.
        path: String,
    },
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Every registered API path with its contract.
static REGISTERED: [(&str, &Contract); 38] = [
    ("root", &ROOT),
    ("extraKwargs", &EXTRA_KWARGS),
    ("settings", &SETTINGS),
    ("settings.demo.*", &SETTINGS_DEMO),
    ("settings.sync.*", &SETTINGS_SYNC),
    ("settings.time", &SETTINGS_TIME),
    ("settings.defaults", &SETTINGS_DEFAULTS),
    ("appBar", &APP_BAR),
    ("appBar.data.*", &APP_BAR_DATA),
    ("panes", &PANES),
    ("panes.data.*", &PANE),
    ("pages", &PAGES),
    ("pages.data.*", &PAGE),
    ("pages.data.*.pageLayout.*", &PAGE_LAYOUT_ITEM),
    ("maps", &MAPS),
    ("maps.data.*", &MAP),
    ("maps.data.*.defaultViewport", &VIEWPORT),
    ("maps.data.*.optionalViewports.*", &OPTIONAL_VIEWPORT),
    ("maps.data.*.legendGroups.*", &LEGEND_GROUP),
    ("maps.data.*.legendGroups.*.data.*", &LEGEND_GROUP_DATA),
    ("maps.additionalMapStyles.*", &MAP_STYLE),
    ("mapFeatures", &MAP_FEATURES),
    ("mapFeatures.data.*", &MAP_FEATURE),
    ("mapFeatures.data.*.data", &FEATURE_DATA),
    ("mapFeatures.data.*.data.location", &FEATURE_LOCATION),
    ("mapFeatures.data.*.geoJson", &GEO_JSON),
    ("globalOutputs", &GLOBAL_OUTPUTS),
    ("groupedOutputs", &GROUPED_OUTPUTS),
    ("groupedOutputs.groupings.*", &GROUPING),
    ("groupedOutputs.groupings.*.levels.*", &GROUPING_LEVEL),
    ("groupedOutputs.data.*", &GROUPED_DATA),
    ("props.*", &PROPS),
    ("props.*.options.*", &PROP_OPTIONS),
    ("layout", &LAYOUT),
    ("values", &VALUES),
    ("valueLists", &VALUE_LISTS),
    ("colorByOptions.*", &COLOR_BY_OPTIONS),
    ("sizeByOptions.*", &SIZE_BY_OPTIONS),
];

/// Contracts keyed by API path.
///
/// # Invariants
/// - Built once; iteration is sorted by API path.
#[derive(Debug)]
pub struct ContractRegistry {
    /// Registered contracts.
    contracts: BTreeMap<&'static str, &'static Contract>,
}

impl ContractRegistry {
    /// Builds the registry of built-in domain contracts.
    fn builtin() -> Self {
        Self {
            contracts: REGISTERED.iter().copied().collect(),
        }
    }

    /// Returns the contract registered for `api_path`.
    #[must_use]
    pub fn get(&self, api_path: &str) -> Option<&'static Contract> {
        self.contracts.get(api_path).copied()
    }

    /// Iterates `(api_path, contract)` pairs sorted by API path.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static Contract)> + '_ {
        self.contracts.iter().map(|(path, contract)| (*path, *contract))
    }

    /// Iterates registered API paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.contracts.keys().copied()
    }

    /// Returns the number of registered API paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Returns true when no contract is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

/// Returns the process-wide contract registry.
#[must_use]
pub fn registry() -> &'static ContractRegistry {
    static REGISTRY: OnceLock<ContractRegistry> = OnceLock::new();
    REGISTRY.get_or_init(ContractRegistry::builtin)
}

// ============================================================================
// SECTION: Fragment Validation
// ============================================================================

/// Validates `fragment` against the contract registered at `api_path`.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownPath`] when no contract is registered.
pub fn validate_fragment<I, S>(
    api_path: &str,
    fragment: &Value,
    ignore_keys: I,
) -> Result<ValidationLog, RegistryError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    validate_fragment_with(api_path, fragment, &Context::with_ignore_keys(ignore_keys))
}

/// Validates `fragment` at `api_path` with a caller-built context.
///
/// Use this to supply cross-reference ids or the `currentFieldId` of a
/// wildcard entry.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownPath`] when no contract is registered.
pub fn validate_fragment_with(
    api_path: &str,
    fragment: &Value,
    ctx: &Context,
) -> Result<ValidationLog, RegistryError> {
    let contract = registry().get(api_path).ok_or_else(|| RegistryError::UnknownPath {
        path: api_path.to_string(),
    })?;
    let mut log = ValidationLog::new();
    validate_at(fragment, contract, &mut log, Vec::new(), ctx);
    Ok(log)
}
