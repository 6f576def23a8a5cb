//! Per-agent handle: policy configuration and the authorization decision.
//!
//! `authorize` is fail-safe. Every inner error is converted into a DENIED
//! decision in `evaluate_at`, and every call appends exactly one audit
//! record before returning. Configuration calls (`set_limit`,
//! `allow_action`) return errors to the caller instead.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use guardrails_core::error::{GuardrailsError, Result};
use guardrails_core::policy::{is_allowed, parse_window, remaining_budget, within_limit};
use guardrails_core::types::{
    to_params, ActionRequest, AgentPolicy, AgentProfile, AllowRule, AuditRecord, LimitConfig,
    ParamValue, Params,
};

use crate::decision::{Decision, DenyReason};
use crate::store::StateStore;

#[derive(Clone)]
pub struct Agent {
    agent_id: String,
    store: Arc<dyn StateStore>,
    // Serializes load -> match -> account -> append for this agent.
    gate: Arc<Mutex<()>>,
}

impl Agent {
    /// Persist a fresh policy (no limits, no rules) for `profile.agent_id`.
    pub fn register(store: Arc<dyn StateStore>, profile: AgentProfile) -> Result<Self> {
        let policy = AgentPolicy::new(profile)?;
        if store.load_policy(&policy.agent_id)?.is_some() {
            return Err(GuardrailsError::AgentExists(policy.agent_id));
        }
        store.save_policy(&policy)?;
        tracing::info!(agent = %policy.agent_id, wallet = %policy.wallet, "agent registered");
        Ok(Self::open(store, policy.agent_id))
    }

    /// Bind to an existing agent id. Does no I/O.
    ///
    /// The handle gets a private decision gate: its own calls are
    /// serialized, but two handles from separate `open` calls are not
    /// serialized with each other. Use `Guardrails::agent` when several
    /// handles for one id may authorize concurrently.
    pub fn open(store: Arc<dyn StateStore>, agent_id: impl Into<String>) -> Self {
        Self::with_gate(store, agent_id, Arc::new(Mutex::new(())))
    }

    pub(crate) fn with_gate(
        store: Arc<dyn StateStore>,
        agent_id: impl Into<String>,
        gate: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            store,
            gate,
        }
    }

    pub fn id(&self) -> &str {
        &self.agent_id
    }

    pub fn policy(&self) -> Result<AgentPolicy> {
        self.store
            .load_policy(&self.agent_id)?
            .ok_or_else(|| GuardrailsError::AgentNotFound(self.agent_id.clone()))
    }

    /// Set or replace the spending cap for `asset` over `window` (`24h`, `7d`).
    pub fn set_limit(&self, asset: &str, amount: Decimal, window: &str) -> Result<()> {
        let window_seconds = parse_window(window)?;
        let limit = LimitConfig::new(asset, amount, window_seconds)?;

        let _g = self.lock_gate()?;
        let mut policy = self.policy()?;
        policy.set_limit(limit);
        self.store.save_policy(&policy)?;

        tracing::info!(agent = %self.agent_id, asset, %amount, window_seconds, "limit set");
        Ok(())
    }

    /// Append an allow rule. Existing rules are never merged or replaced.
    pub fn allow_action<I, K, V>(&self, action_type: &str, constraints: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        let rule = AllowRule::new(action_type, to_params(constraints))?;

        let _g = self.lock_gate()?;
        let mut policy = self.policy()?;
        policy.add_rule(rule);
        self.store.save_policy(&policy)?;

        tracing::info!(agent = %self.agent_id, action = action_type, "allow rule added");
        Ok(())
    }

    pub fn authorize(&self, action_type: &str, params: &Params) -> bool {
        self.authorize_at(action_type, params, Utc::now())
    }

    pub fn authorize_at(&self, action_type: &str, params: &Params, now: DateTime<Utc>) -> bool {
        self.evaluate_at(action_type, params, now).is_allowed()
    }

    /// Full decision for one request, logged to the audit trail.
    pub fn evaluate_at(&self, action_type: &str, params: &Params, now: DateTime<Utc>) -> Decision {
        let span = tracing::info_span!("authorize", agent = %self.agent_id, action = %action_type);
        let _enter = span.enter();

        let gate = self.gate.lock();
        let decision = match &gate {
            Ok(_) => self
                .decide(action_type, params, now)
                .unwrap_or_else(|e| Decision::Deny(DenyReason::Error(e.to_string()))),
            Err(_) => Decision::Deny(DenyReason::Error("decision gate poisoned".into())),
        };

        self.record(action_type, params, decision, now)
    }

    pub fn get_audit_trail(&self, limit: Option<usize>) -> Result<Vec<AuditRecord>> {
        self.store.get_records(&self.agent_id, limit)
    }

    /// Unspent budget for `asset` right now; `None` when no limit is set.
    pub fn remaining(&self, asset: &str) -> Result<Option<Decimal>> {
        self.remaining_at(asset, Utc::now())
    }

    pub fn remaining_at(&self, asset: &str, now: DateTime<Utc>) -> Result<Option<Decimal>> {
        let policy = self.policy()?;
        let Some(limit) = policy.limit_for(asset) else {
            return Ok(None);
        };
        let history = self.store.get_records(&self.agent_id, None)?;
        Ok(Some(remaining_budget(limit, &history, &self.agent_id, now)))
    }

    fn decide(&self, action_type: &str, params: &Params, now: DateTime<Utc>) -> Result<Decision> {
        let policy = self.policy()?;
        let request = ActionRequest::normalize(params);

        // Constraints match against the raw params, not the normalized view.
        if !is_allowed(action_type, params, &policy.allow_rules) {
            return Ok(Decision::Deny(DenyReason::NotAllowlisted));
        }

        let Some(amount) = request.amount else {
            if let Some(raw) = params.get("amount") {
                return Err(GuardrailsError::InvalidAmount(format!("unusable amount: {raw}")));
            }
            return Ok(Decision::Allow);
        };

        let Some(limit) = request
            .resolved_asset(params)
            .and_then(|asset| policy.limit_for(asset))
        else {
            return Ok(Decision::Allow);
        };

        let history = self.store.get_records(&self.agent_id, None)?;
        if within_limit(&limit.asset, amount, limit, &history, &self.agent_id, now) {
            Ok(Decision::Allow)
        } else {
            Ok(Decision::Deny(DenyReason::LimitExceeded {
                asset: limit.asset.clone(),
                cap: limit.amount,
                window_seconds: limit.window_seconds,
            }))
        }
    }

    // An allow that cannot be logged is turned into a deny.
    fn record(
        &self,
        action_type: &str,
        params: &Params,
        decision: Decision,
        now: DateTime<Utc>,
    ) -> Decision {
        let record = AuditRecord::new(
            now,
            self.agent_id.as_str(),
            action_type,
            params.clone(),
            decision.is_allowed(),
            decision.reason(),
        );

        if let Err(e) = self.store.append_record(&record) {
            tracing::error!(error = %e, allowed = record.allowed, "audit append failed");
            return Decision::Deny(DenyReason::Error(format!("audit append failed: {e}")));
        }

        match &decision {
            Decision::Allow => tracing::debug!("authorized"),
            Decision::Deny(reason) => tracing::warn!(%reason, "denied"),
        }
        decision
    }

    fn lock_gate(&self) -> Result<MutexGuard<'_, ()>> {
        self.gate
            .lock()
            .map_err(|_| GuardrailsError::Storage("decision gate poisoned".into()))
    }
}
