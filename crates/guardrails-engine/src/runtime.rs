//! Config-driven bootstrap.
//!
//! - Open the configured store (explicit path, no implicit default).
//! - Seed agents declared in config into an empty store.
//! - Hand out `Agent` handles that share one decision gate per agent id.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use guardrails_core::error::Result;
use guardrails_core::types::{AgentPolicy, AgentProfile, AllowRule};

use crate::agent::Agent;
use crate::config::{AgentSeed, GuardrailsConfig, StorageBackend};
use crate::store::{JsonFileStore, MemoryStore, StateStore};

#[derive(Clone)]
pub struct Guardrails {
    store: Arc<dyn StateStore>,
    gates: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl Guardrails {
    /// Wrap an already-open store.
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            gates: Arc::new(DashMap::new()),
        }
    }

    /// Build from validated config. Returns Result so startup errors are explicit.
    pub fn from_config(cfg: &GuardrailsConfig) -> Result<Self> {
        let store: Arc<dyn StateStore> = match cfg.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::JsonFile => {
                // validate() guarantees a path for this backend
                let path = cfg.storage.path.clone().unwrap_or_default();
                Arc::new(JsonFileStore::open(path)?)
            }
        };

        let rt = Self::new(store);
        for seed in &cfg.agents {
            rt.seed(seed)?;
        }
        Ok(rt)
    }

    pub fn store(&self) -> Arc<dyn StateStore> {
        Arc::clone(&self.store)
    }

    pub fn register(&self, profile: AgentProfile) -> Result<Agent> {
        let id = profile.agent_id.clone();
        Agent::register(self.store(), profile)?;
        Ok(self.agent(&id))
    }

    /// Handle for `agent_id`. Handles for the same id serialize their decisions.
    pub fn agent(&self, agent_id: &str) -> Agent {
        let gate = self
            .gates
            .entry(agent_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        Agent::with_gate(self.store(), agent_id, gate)
    }

    // Seeding never touches an agent that already has a stored policy, so
    // restarts do not duplicate rules.
    fn seed(&self, seed: &AgentSeed) -> Result<()> {
        if self.store.load_policy(&seed.id)?.is_some() {
            tracing::debug!(agent = %seed.id, "agent already stored, skipping seed");
            return Ok(());
        }

        let mut profile = AgentProfile::new(seed.id.clone(), seed.wallet.clone());
        profile.name = seed.name.clone();
        profile.metadata = seed.metadata.clone();

        let mut policy = AgentPolicy::new(profile)?;
        for limit in &seed.limits {
            policy.set_limit(limit.to_limit()?);
        }
        for allow in &seed.allow {
            policy.add_rule(AllowRule::new(allow.action.clone(), allow.constraints.clone())?);
        }
        self.store.save_policy(&policy)?;

        tracing::info!(
            agent = %seed.id,
            limits = policy.limits.len(),
            rules = policy.allow_rules.len(),
            "agent seeded from config"
        );
        Ok(())
    }
}
