// crates/session-check-api/tests/proptest_session.rs
// ============================================================================
// Module: Session Property-Based Tests
// Description: Property tests for determinism and totality of validation.
// Purpose: Detect panics and unstable output across arbitrary documents.
// ============================================================================

//! Property-based tests for session validation invariants.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use common::full_session;
use proptest::prelude::*;
use serde_json::Map;
use serde_json::Value;
use session_check_api::SessionValidator;
use session_check_api::registry;
use session_check_api::validate_fragment;

/// Field names the contracts look at, mixed with arbitrary keys.
const VOCABULARY: [&str; 40] = [
    "settings",
    "appBar",
    "panes",
    "pages",
    "maps",
    "mapFeatures",
    "groupedOutputs",
    "globalOutputs",
    "extraKwargs",
    "data",
    "props",
    "values",
    "valueLists",
    "layout",
    "type",
    "variant",
    "name",
    "options",
    "path",
    "itemId",
    "iconUrl",
    "time",
    "timeLength",
    "pageLayout",
    "mapId",
    "location",
    "latitude",
    "longitude",
    "geoJson",
    "legendGroups",
    "colorByOptions",
    "groupings",
    "levels",
    "stats",
    "groupLists",
    "groupingId",
    "statId",
    "order",
    "timeValues",
    "currentPage",
];

fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::sample::select(VOCABULARY.to_vec()).prop_map(str::to_string),
        1 => "[a-z]{1,4}",
    ]
}

fn json_value_strategy(max_depth: u32) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|v| Value::Number(v.into())),
        any::<f64>()
            .prop_filter("finite", |v| v.is_finite())
            .prop_map(|v| { serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number) }),
        prop::sample::select(vec!["num", "selector", "grid", "item", "map", "geo", "arc"])
            .prop_map(|text| Value::String(text.to_string())),
        ".*".prop_map(Value::String),
    ];

    leaf.prop_recursive(max_depth, 96, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0 .. 4).prop_map(Value::Array),
            prop::collection::btree_map(key_strategy(), inner, 0 .. 6)
                .prop_map(|map| Value::Object(map.into_iter().collect::<Map<String, Value>>())),
        ]
    })
}

fn corrupted_full_session() -> impl Strategy<Value = Value> {
    (prop::sample::select(VOCABULARY[.. 9].to_vec()), json_value_strategy(4)).prop_map(
        |(section, replacement)| {
            let mut document = full_session();
            if let Value::Object(fields) = &mut document {
                fields.insert(section.to_string(), replacement);
            }
            document
        },
    )
}

proptest! {
    #[test]
    fn validation_is_deterministic(document in json_value_strategy(5)) {
        let first = SessionValidator::new(&document, ["order"]).into_log();
        let second = SessionValidator::new(&document, ["order"]).into_log();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn arbitrary_documents_always_complete(document in json_value_strategy(6)) {
        let validator = SessionValidator::new(&document, Vec::<String>::new());
        if !document.is_object() {
            prop_assert_eq!(validator.log().error_count(), 1);
        }
    }

    #[test]
    fn corrupted_sections_always_complete(document in corrupted_full_session()) {
        let first = SessionValidator::new(&document, Vec::<String>::new()).into_log();
        let second = SessionValidator::new(&document, Vec::<String>::new()).into_log();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_registered_contract_accepts_any_fragment(fragment in json_value_strategy(4)) {
        for api_path in registry().paths() {
            let log = validate_fragment(api_path, &fragment, Vec::<String>::new());
            prop_assert!(log.is_ok());
        }
    }
}
