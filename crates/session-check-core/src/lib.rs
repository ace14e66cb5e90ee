// crates/session-check-core/src/lib.rs
// ============================================================================
// Module: Session Check Core Library
// Description: Generic recursive schema-validation engine.
// Purpose: Walk session documents against pluggable contracts and collect diagnostics.
// Dependencies: serde, serde_json, thiserror, time, url
// ============================================================================

//! ## Overview
//! `session-check-core` is the engine behind Session Check. It knows nothing
//! about dashboards: domain crates describe each node kind as a
//! [`Contract`] (a resolve function returning a [`ContractShape`] plus an
//! optional nested hook), and the engine walks the document, tracks paths,
//! threads a read-only [`Context`] of cross-reference ids, and accumulates
//! path-tagged [`Diagnostic`] entries in a [`ValidationLog`].
//!
//! Validation is advisory. No function in this crate returns an error for
//! bad input data; callers inspect [`ValidationLog::has_errors`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod checks;
pub mod context;
pub mod contract;
pub mod diagnostics;
pub mod engine;
pub mod path;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::ValidationAuditEvent;
pub use audit::ValidationAuditEventParams;
pub use audit::ValidationAuditSink;
pub use checks::FormatError;
pub use context::Context;
pub use context::ContextKey;
pub use context::ContextValue;
pub use contract::Contract;
pub use contract::ContractShape;
pub use contract::FieldKind;
pub use contract::FieldRule;
pub use contract::NestedFailure;
pub use contract::NestedHook;
pub use contract::Node;
pub use contract::ResolveFn;
pub use contract::SpecError;
pub use contract::kinds;
pub use diagnostics::Diagnostic;
pub use diagnostics::PathSegment;
pub use diagnostics::Severity;
pub use diagnostics::ValidationLog;
pub use diagnostics::render_path;
pub use engine::NodeOutcome;
pub use engine::dispatch_child;
pub use engine::dispatch_keys;
pub use engine::failure_barrier;
pub use engine::validate;
pub use engine::validate_at;
pub use engine::validate_child;
pub use engine::validate_sequence;
pub use path::PathTracker;
