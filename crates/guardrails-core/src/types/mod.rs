//! Data model shared by the policy functions and the engine.
//!
//! - `params`: request parameter values and the normalized request view.
//! - `policy`: allow rules, limits, and the per-agent policy document.
//! - `record`: the append-only audit record.

pub mod params;
pub mod policy;
pub mod record;

pub use params::{parse_decimal, to_params, ActionRequest, ParamValue, Params};
pub use policy::{AgentPolicy, AgentProfile, AllowRule, LimitConfig};
pub use record::AuditRecord;
