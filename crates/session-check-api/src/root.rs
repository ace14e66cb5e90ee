// crates/session-check-api/src/root.rs
// ============================================================================
// Module: Root Orchestration
// Description: Root contract, section ordering, and the session entry point.
// Purpose: Validate a whole session document in dependency order.
// Dependencies: session-check-core, serde_json
// ============================================================================

//! ## Overview
//! The root hook validates sections in [`SECTION_ORDER`]. After each section
//! it collects that section's ids into the context, so later sections can
//! check their references: maps see map feature props, pages see map,
//! global output, and grouped output ids, and the app bar sees page and pane
//! ids. An absent or malformed section contributes an empty id set, which
//! makes every reference to it invalid.
//!
//! Optional sections that are absent or empty are skipped. `settings` is
//! always validated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Value;
use session_check_core::Context;
use session_check_core::Contract;
use session_check_core::ContractShape;
use session_check_core::NestedFailure;
use session_check_core::Node;
use session_check_core::PathTracker;
use session_check_core::SpecError;
use session_check_core::ValidationAuditEvent;
use session_check_core::ValidationAuditEventParams;
use session_check_core::ValidationAuditSink;
use session_check_core::ValidationLog;
use session_check_core::kinds;
use session_check_core::validate;
use session_check_core::validate_at;
use session_check_core::validate_child;

use crate::app_bar::APP_BAR;
use crate::extra_kwargs::EXTRA_KWARGS;
use crate::global_outputs::GLOBAL_OUTPUTS;
use crate::grouped_outputs::GROUPED_OUTPUTS;
use crate::keys;
use crate::map_features::MAP_FEATURES;
use crate::maps::MAPS;
use crate::pages::PAGES;
use crate::panes::PANES;
use crate::settings::SETTINGS;

// ============================================================================
// SECTION: Section Order
// ============================================================================

/// Top-level sections in validation order.
pub const SECTION_ORDER: [&str; 9] = [
    "extraKwargs",
    "settings",
    "panes",
    "mapFeatures",
    "maps",
    "globalOutputs",
    "groupedOutputs",
    "pages",
    "appBar",
];

/// Returns the top-level sections in validation order.
#[must_use]
pub const fn section_order() -> &'static [&'static str] {
    &SECTION_ORDER
}

// ============================================================================
// SECTION: Root Contract
// ============================================================================

/// Contract for the document root.
pub static ROOT: Contract = Contract::new("root", resolve_root).with_nested(root_nested);

/// Root fields.
fn resolve_root(_node: &Node<'_>, _ctx: &Context) -> Result<ContractShape, SpecError> {
    Ok(ContractShape::new()
        .required("settings", kinds::MAPPING)
        .required("appBar", kinds::MAPPING)
        .optional("panes", kinds::MAPPING)
        .optional("pages", kinds::MAPPING)
        .optional("maps", kinds::MAPPING)
        .optional("mapFeatures", kinds::MAPPING)
        .optional("groupedOutputs", kinds::MAPPING)
        .optional("globalOutputs", kinds::MAPPING)
        .optional("extraKwargs", kinds::MAPPING)
        .optional("associated", kinds::ANY))
}

/// Validates every section in order, threading collected ids forward.
fn root_nested(
    node: &Node<'_>,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) -> Result<(), NestedFailure> {
    validate_child(node, "extraKwargs", &EXTRA_KWARGS, tracker, ctx);
    validate_child(node, "settings", &SETTINGS, tracker, ctx);

    validate_section(node, "panes", &PANES, tracker, ctx);
    let ctx = ctx.with_ids(keys::VALID_PANE_IDS, data_keys(node, "panes"));

    validate_section(node, "mapFeatures", &MAP_FEATURES, tracker, &ctx);
    let ctx = ctx.with_id_map(keys::FEATURE_PROPS, feature_props(node));

    validate_section(node, "maps", &MAPS, tracker, &ctx);
    let ctx = ctx.with_ids(keys::VALID_MAP_IDS, data_keys(node, "maps"));

    validate_section(node, "globalOutputs", &GLOBAL_OUTPUTS, tracker, &ctx);
    let ctx = ctx.with_ids(keys::VALID_GLOBAL_OUTPUT_IDS, global_output_ids(node));

    validate_section(node, "groupedOutputs", &GROUPED_OUTPUTS, tracker, &ctx);
    let ctx = ctx
        .with_id_map(keys::GROUPED_LEVEL_IDS, grouped_ids(node, "groupings", "levels"))
        .with_id_map(keys::GROUPED_STAT_IDS, grouped_ids(node, "data", "stats"))
        .with_id_map(keys::GROUPED_GROUP_IDS, grouped_ids(node, "data", "groupLists"));

    validate_section(node, "pages", &PAGES, tracker, &ctx);
    let ctx = ctx.with_ids(keys::VALID_PAGE_IDS, data_keys(node, "pages"));

    validate_section(node, "appBar", &APP_BAR, tracker, &ctx);
    Ok(())
}

/// Validates a section unless it is absent or an empty mapping.
fn validate_section(
    node: &Node<'_>,
    section: &str,
    contract: &Contract,
    tracker: &mut PathTracker<'_>,
    ctx: &Context,
) {
    match node.get(section) {
        None => {}
        Some(Value::Object(fields)) if fields.is_empty() => {}
        Some(value) => {
            validate(value, contract, &mut tracker.nested(section), ctx);
        }
    }
}

// ============================================================================
// SECTION: Id Extraction
// ============================================================================

/// Views `node[key]` as a mapping node when it is one.
fn child_node<'a>(node: &Node<'a>, key: &str) -> Option<Node<'a>> {
    node.get(key).and_then(Value::as_object).map(|fields| node.child(fields))
}

/// Keys of `section.data`, empty when missing or malformed.
fn data_keys(node: &Node<'_>, section: &str) -> Vec<String> {
    child_node(node, section).map(|section| section.child_keys("data")).unwrap_or_default()
}

/// Prop ids of every map feature, keyed by feature id.
fn feature_props(node: &Node<'_>) -> BTreeMap<String, Vec<String>> {
    child_node(node, "mapFeatures")
        .and_then(|features| child_node(&features, "data"))
        .map(|features| owned_child_keys(&features, "props"))
        .unwrap_or_default()
}

/// Prop ids of the global outputs.
fn global_output_ids(node: &Node<'_>) -> Vec<String> {
    child_node(node, "globalOutputs").map(|outputs| outputs.child_keys("props")).unwrap_or_default()
}

/// For each entry of `groupedOutputs.<container>`, the keys of its `field`.
fn grouped_ids(node: &Node<'_>, container: &str, field: &str) -> BTreeMap<String, Vec<String>> {
    child_node(node, "groupedOutputs")
        .and_then(|outputs| child_node(&outputs, container))
        .map(|entries| owned_child_keys(&entries, field))
        .unwrap_or_default()
}

/// Maps each mapping entry of `entries` to the keys of its `field`.
fn owned_child_keys(entries: &Node<'_>, field: &str) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .filter_map(|(owner, value)| {
            let owned = value.as_object().map(|fields| entries.child(fields))?;
            Some((owner.clone(), owned.child_keys(field)))
        })
        .collect()
}

// ============================================================================
// SECTION: Session Validator
// ============================================================================

/// Validates a whole session document.
///
/// The run completes for any input; inspect [`SessionValidator::is_valid`]
/// or the [`ValidationLog`] afterwards.
#[derive(Debug, Clone)]
pub struct SessionValidator {
    /// Diagnostics of the run.
    log: ValidationLog,
    /// Top-level sections present in the document, in validation order.
    sections: Vec<String>,
    /// Number of field names skipped during the run.
    ignored_keys: usize,
}

impl SessionValidator {
    /// Validates `session`, skipping `ignore_keys` at every level.
    #[must_use]
    pub fn new<I, S>(session: &Value, ignore_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ctx = Context::with_ignore_keys(ignore_keys);
        let mut log = ValidationLog::new();
        validate_at(session, &ROOT, &mut log, Vec::new(), &ctx);
        let sections = match session {
            Value::Object(fields) => SECTION_ORDER
                .iter()
                .filter(|section| fields.contains_key(**section) && !ctx.is_ignored(section))
                .map(|section| (*section).to_string())
                .collect(),
            _ => Vec::new(),
        };
        Self {
            log,
            sections,
            ignored_keys: ctx.ignore_keys().len(),
        }
    }

    /// Validates `session` and records one audit event on `sink`.
    #[must_use]
    pub fn with_audit<I, S>(session: &Value, ignore_keys: I, sink: &dyn ValidationAuditSink) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let validator = Self::new(session, ignore_keys);
        sink.record(&ValidationAuditEvent::new(ValidationAuditEventParams {
            log: &validator.log,
            sections: validator.sections.clone(),
            ignored_keys: validator.ignored_keys,
        }));
        validator
    }

    /// Returns the diagnostics of the run.
    #[must_use]
    pub const fn log(&self) -> &ValidationLog {
        &self.log
    }

    /// Consumes the validator and returns its diagnostics.
    #[must_use]
    pub fn into_log(self) -> ValidationLog {
        self.log
    }

    /// Returns true when no error-level diagnostic was reported.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.log.has_errors()
    }

    /// Top-level sections present in the document, in validation order.
    #[must_use]
    pub fn sections(&self) -> &[String] {
        &self.sections
    }
}
