//! State store contract and built-in implementations.
//!
//! The engine only ever talks to `dyn StateStore`. Writes must be durable
//! before the call returns and reads must observe every earlier write made
//! through the same store (read-your-writes).

pub mod json_file;
pub mod memory;

use guardrails_core::error::Result;
use guardrails_core::types::{AgentPolicy, AuditRecord};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

pub trait StateStore: Send + Sync {
    /// Idempotent upsert keyed by `policy.agent_id`.
    fn save_policy(&self, policy: &AgentPolicy) -> Result<()>;

    fn load_policy(&self, agent_id: &str) -> Result<Option<AgentPolicy>>;

    /// Ordered append; records for one agent keep insertion order.
    fn append_record(&self, record: &AuditRecord) -> Result<()>;

    /// Records for `agent_id`, oldest first. With `limit`, only the most
    /// recent `limit` records (still oldest first).
    fn get_records(&self, agent_id: &str, limit: Option<usize>) -> Result<Vec<AuditRecord>>;
}

/// Keep the newest `limit` items of an oldest-first list.
pub(crate) fn tail<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(n) = limit {
        let skip = items.len().saturating_sub(n);
        items.drain(..skip);
    }
    items
}
