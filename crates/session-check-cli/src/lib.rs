// crates/session-check-cli/src/lib.rs
// ============================================================================
// Module: Session Check CLI Library
// Description: Shared helpers for the Session Check command-line interface.
// Purpose: Provide the message catalog and report rendering for the binary and tests.
// Dependencies: serde_json, session-check-core
// ============================================================================

//! ## Overview
//! This library houses the CLI message catalog and the renderers that turn a
//! [`session_check_core::ValidationLog`] into terminal or JSON output. The
//! binary entry point (`src/main.rs`) imports these helpers so every
//! user-facing string has one home.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Message catalog and the [`t!`] macro.
pub mod messages;
/// Report rendering and exit status.
pub mod report;
