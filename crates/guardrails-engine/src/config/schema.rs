use std::collections::HashSet;
use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;

use guardrails_core::error::{GuardrailsError, Result};
use guardrails_core::policy::parse_window;
use guardrails_core::types::{LimitConfig, Params};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardrailsConfig {
    pub version: u32,

    #[serde(default)]
    pub storage: StorageSection,

    /// Policies seeded into an empty store at startup.
    #[serde(default)]
    pub agents: Vec<AgentSeed>,
}

impl GuardrailsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GuardrailsError::UnsupportedVersion(self.version));
        }

        self.storage.validate()?;

        let mut seen = HashSet::new();
        for agent in &self.agents {
            agent.validate()?;
            if !seen.insert(agent.id.as_str()) {
                return Err(GuardrailsError::BadConfig(format!(
                    "duplicate agent id: {}",
                    agent.id
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Memory,
    JsonFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageSection {
    pub fn validate(&self) -> Result<()> {
        match (self.backend, &self.path) {
            (StorageBackend::JsonFile, None) => Err(GuardrailsError::BadConfig(
                "storage.path is required for the json_file backend".into(),
            )),
            (StorageBackend::JsonFile, Some(p)) if p.as_os_str().is_empty() => Err(
                GuardrailsError::BadConfig("storage.path must not be empty".into()),
            ),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentSeed {
    pub id: String,
    pub wallet: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub metadata: Params,
    #[serde(default)]
    pub limits: Vec<LimitSeed>,
    #[serde(default)]
    pub allow: Vec<AllowSeed>,
}

impl AgentSeed {
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(GuardrailsError::BadConfig("agents[].id must not be empty".into()));
        }
        if self.wallet.is_empty() {
            return Err(GuardrailsError::BadConfig(format!(
                "agent {}: wallet must not be empty",
                self.id
            )));
        }
        for limit in &self.limits {
            limit
                .to_limit()
                .map_err(|e| GuardrailsError::BadConfig(format!("agent {}: {e}", self.id)))?;
        }
        if self.allow.iter().any(|a| a.action.is_empty()) {
            return Err(GuardrailsError::BadConfig(format!(
                "agent {}: allow[].action must not be empty",
                self.id
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitSeed {
    pub asset: String,
    pub amount: Decimal,
    /// `<number><h|d>`, e.g. `24h`.
    pub window: String,
}

impl LimitSeed {
    pub fn to_limit(&self) -> Result<LimitConfig> {
        LimitConfig::new(self.asset.clone(), self.amount, parse_window(&self.window)?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllowSeed {
    pub action: String,
    #[serde(default)]
    pub constraints: Params,
}
