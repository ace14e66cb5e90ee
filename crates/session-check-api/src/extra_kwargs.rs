// crates/session-check-api/src/extra_kwargs.rs
// ============================================================================
// Module: Extra Keyword Arguments
// Description: Contract for the server-specific `extraKwargs` bag.
// Purpose: Accept arbitrary server arguments without unknown-field warnings.
// Dependencies: session-check-core
// ============================================================================

//! ## Overview
//! `extraKwargs` is forwarded untouched to the server. The only requirement
//! is that it is a mapping; its keys are not enforced.

// ============================================================================
// SECTION: Imports
// ============================================================================

use session_check_core::Contract;
use session_check_core::contract::open_shape;

// ============================================================================
// SECTION: Contract
// ============================================================================

/// Contract for `extraKwargs`.
pub static EXTRA_KWARGS: Contract = Contract::new("extraKwargs", open_shape);
