//! guardrails core: pure authorization primitives, data model, and errors.
//!
//! This crate holds the deterministic half of the authorization layer: the
//! time-window parser, the allowlist rule matcher, and the rolling-window
//! limit accountant. It performs no I/O; storage and orchestration live in
//! `guardrails-engine`.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed input surfaces as `GuardrailsError` or as a `false` decision.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod policy;
pub mod types;

pub use error::{ErrorCode, GuardrailsError, Result};
pub use policy::{is_allowed, parse_window, remaining_budget, within_limit};
pub use types::{
    to_params, ActionRequest, AgentPolicy, AgentProfile, AllowRule, AuditRecord, LimitConfig,
    ParamValue, Params,
};
