//! guardrails engine library entry.
//!
//! This crate wires the pure policy functions from `guardrails-core` to a
//! state store: the per-agent `Agent` handle makes authorization decisions
//! and keeps the audit log, `config` loads YAML, and `runtime` bootstraps a
//! store plus seeded agents from that config.

pub mod agent;
pub mod config;
pub mod decision;
pub mod runtime;
pub mod store;

pub use agent::Agent;
pub use decision::{Decision, DenyReason};
pub use runtime::Guardrails;
pub use store::{JsonFileStore, MemoryStore, StateStore};
