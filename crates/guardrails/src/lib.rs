//! Top-level facade crate for guardrails.
//!
//! Re-exports the core types and the engine so users can depend on a single crate.

pub mod core {
    pub use guardrails_core::*;
}

pub mod engine {
    pub use guardrails_engine::*;
}

pub use guardrails_core::{to_params, AuditRecord, GuardrailsError, ParamValue, Params, Result};
pub use guardrails_engine::{Agent, Decision, DenyReason, Guardrails};
