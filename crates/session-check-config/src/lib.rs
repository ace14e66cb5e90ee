// crates/session-check-config/src/lib.rs
// ============================================================================
// Module: Session Check Config Library
// Description: Canonical config model and fail-closed validation.
// Purpose: Single source of truth for session-check.toml semantics.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! `session-check-config` defines the configuration model read by the
//! `session-check` binary. Loading enforces hard path and size limits, and
//! validation rejects out-of-range values before any document is checked.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
