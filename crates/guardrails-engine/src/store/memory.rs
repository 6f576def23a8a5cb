use dashmap::DashMap;

use guardrails_core::error::Result;
use guardrails_core::types::{AgentPolicy, AuditRecord};

use super::{tail, StateStore};

/// Volatile store for tests and embedded use.
///
/// Records are bucketed per agent, so a limit check only touches the
/// history of the agent being authorized.
#[derive(Default)]
pub struct MemoryStore {
    policies: DashMap<String, AgentPolicy>,
    records: DashMap<String, Vec<AuditRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            policies: DashMap::new(),
            records: DashMap::new(),
        }
    }
}

impl StateStore for MemoryStore {
    fn save_policy(&self, policy: &AgentPolicy) -> Result<()> {
        self.policies.insert(policy.agent_id.clone(), policy.clone());
        Ok(())
    }

    fn load_policy(&self, agent_id: &str) -> Result<Option<AgentPolicy>> {
        Ok(self.policies.get(agent_id).map(|p| p.value().clone()))
    }

    fn append_record(&self, record: &AuditRecord) -> Result<()> {
        self.records
            .entry(record.agent_id.clone())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    fn get_records(&self, agent_id: &str, limit: Option<usize>) -> Result<Vec<AuditRecord>> {
        let all = self
            .records
            .get(agent_id)
            .map(|r| r.value().clone())
            .unwrap_or_default();
        Ok(tail(all, limit))
    }
}
