// crates/session-check-api/src/lib.rs
// ============================================================================
// Module: Session Check API Library
// Description: Domain contracts for dashboard session documents.
// Purpose: Register every API path contract and orchestrate root validation.
// Dependencies: session-check-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Each API path of a session document (for example `maps.data.*` or
//! `props.*`) is described by one static [`Contract`] value. Contracts are
//! plain data plus two function pointers: a decision-table resolver and an
//! optional nested hook that recurses into child contracts.
//!
//! The [`SessionValidator`] entry point validates a whole document, walking
//! sections in a fixed order so that later sections can reference ids
//! collected from earlier ones. [`validate_fragment`] validates a
//! sub-document against any registered API path.
//!
//! [`Contract`]: session_check_core::Contract

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod app_bar;
pub mod extra_kwargs;
pub mod general;
pub mod global_outputs;
pub mod grouped_outputs;
pub mod keys;
pub mod map_features;
pub mod maps;
pub mod pages;
pub mod panes;
pub mod registry;
pub mod root;
pub mod settings;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use registry::ContractRegistry;
pub use registry::RegistryError;
pub use registry::registry;
pub use registry::validate_fragment;
pub use registry::validate_fragment_with;
pub use root::ROOT;
pub use root::SessionValidator;
pub use root::section_order;
