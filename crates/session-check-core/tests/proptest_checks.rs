// crates/session-check-core/tests/proptest_checks.rs
// ============================================================================
// Module: Format Check Property-Based Tests
// Description: Property tests for string format checks and path rendering.
// Purpose: Detect panics and misclassified inputs across arbitrary strings.
// ============================================================================

//! Property-based tests for format check invariants.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use session_check_core::PathSegment;
use session_check_core::checks::Axis;
use session_check_core::checks::check_coordinates;
use session_check_core::checks::check_pixel;
use session_check_core::checks::check_rgba;
use session_check_core::checks::check_url;
use session_check_core::render_path;

fn segment_strategy() -> impl Strategy<Value = PathSegment> {
    prop_oneof![
        "[a-zA-Z]{1,8}".prop_map(PathSegment::Key),
        (0usize .. 64).prop_map(PathSegment::Index),
    ]
}

proptest! {
    #[test]
    fn rgba_accepts_every_in_range_color(
        red in 0u16 ..= 255,
        green in 0u16 ..= 255,
        blue in 0u16 ..= 255,
        alpha in 0u8 ..= 100,
    ) {
        let alpha = f64::from(alpha) / 100.0;
        let color = format!("rgba({red}, {green}, {blue}, {alpha})");
        prop_assert!(check_rgba(&color).is_ok(), "rejected {}", color);
    }

    #[test]
    fn rgba_rejects_out_of_range_channels(red in 256u32 .. 100_000) {
        let color = format!("rgba({red},0,0,1)");
        prop_assert!(check_rgba(&color).is_err());
    }

    #[test]
    fn pixel_accepts_integer_sizes(size in 0u32 .. 10_000) {
        let pixel = format!("{size}px");
        prop_assert!(check_pixel(&pixel).is_ok());
        prop_assert!(check_pixel(&size.to_string()).is_err());
    }

    #[test]
    fn format_checks_never_panic(text in ".*") {
        let _ = check_rgba(&text);
        let _ = check_pixel(&text);
        let _ = check_url(&text);
    }

    #[test]
    fn latitudes_in_range_pass(values in prop::collection::vec(-90.0f64 ..= 90.0, 0 .. 16)) {
        prop_assert!(check_coordinates("latitude", Axis::Latitude, &values).is_ok());
    }

    #[test]
    fn rendered_paths_are_never_empty(path in prop::collection::vec(segment_strategy(), 0 .. 8)) {
        let rendered = render_path(&path);
        prop_assert!(!rendered.is_empty());
        prop_assert_eq!(rendered == "<root>", path.is_empty());
    }
}
