use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{GuardrailsError, Result};
use crate::types::params::Params;

/// One permitted action pattern.
///
/// Rules are disjunctive: several rules for the same `action_type` may
/// coexist and a request passes if any of them matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowRule {
    pub action_type: String,
    #[serde(default)]
    pub constraints: Params,
}

impl AllowRule {
    pub fn new(action_type: impl Into<String>, constraints: Params) -> Result<Self> {
        let action_type = action_type.into();
        if action_type.is_empty() {
            return Err(GuardrailsError::InvalidRule("action_type must not be empty".into()));
        }
        Ok(Self { action_type, constraints })
    }
}

/// Spending cap for one asset over a trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitConfig {
    pub asset: String,
    /// Serialized as exact decimal text.
    pub amount: Decimal,
    pub window_seconds: u64,
}

impl LimitConfig {
    pub fn new(asset: impl Into<String>, amount: Decimal, window_seconds: u64) -> Result<Self> {
        let asset = asset.into();
        if asset.is_empty() {
            return Err(GuardrailsError::InvalidLimit("asset must not be empty".into()));
        }
        if amount <= Decimal::ZERO {
            return Err(GuardrailsError::InvalidLimit(format!(
                "amount must be greater than 0 (got {amount})"
            )));
        }
        if window_seconds == 0 {
            return Err(GuardrailsError::InvalidLimit(
                "window must be greater than 0 seconds".into(),
            ));
        }
        Ok(Self { asset, amount, window_seconds })
    }
}

/// Identity fields supplied at registration.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentProfile {
    pub agent_id: String,
    pub wallet: String,
    pub name: Option<String>,
    pub metadata: Params,
}

impl AgentProfile {
    pub fn new(agent_id: impl Into<String>, wallet: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            wallet: wallet.into(),
            name: None,
            metadata: Params::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Everything the engine knows about one agent, persisted as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPolicy {
    pub agent_id: String,
    pub wallet: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub metadata: Params,
    /// Keyed by asset; last write wins.
    #[serde(default)]
    pub limits: BTreeMap<String, LimitConfig>,
    /// Append-only.
    #[serde(default)]
    pub allow_rules: Vec<AllowRule>,
}

impl AgentPolicy {
    pub fn new(profile: AgentProfile) -> Result<Self> {
        if profile.agent_id.is_empty() {
            return Err(GuardrailsError::InvalidParam("agent_id must not be empty".into()));
        }
        if profile.wallet.is_empty() {
            return Err(GuardrailsError::InvalidParam("wallet must not be empty".into()));
        }
        Ok(Self {
            agent_id: profile.agent_id,
            wallet: profile.wallet,
            name: profile.name,
            metadata: profile.metadata,
            limits: BTreeMap::new(),
            allow_rules: Vec::new(),
        })
    }

    /// Insert or replace the limit for `limit.asset`.
    pub fn set_limit(&mut self, limit: LimitConfig) {
        self.limits.insert(limit.asset.clone(), limit);
    }

    pub fn add_rule(&mut self, rule: AllowRule) {
        self.allow_rules.push(rule);
    }

    pub fn limit_for(&self, asset: &str) -> Option<&LimitConfig> {
        self.limits.get(asset)
    }
}
