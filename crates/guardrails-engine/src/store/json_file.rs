//! Single-file JSON store.
//!
//! Layout:
//! ```json
//! { "agents": { "<agent_id>": { ...policy... } }, "logs": [ { ...record... } ] }
//! ```
//! Every write replaces the whole document through a temp file + fsync +
//! rename, so a crash never leaves a half-written state file behind.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use guardrails_core::error::{GuardrailsError, Result};
use guardrails_core::types::{AgentPolicy, AuditRecord};

use super::{tail, StateStore};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    agents: BTreeMap<String, Value>,
    // Kept as raw values and never rewritten. Entries decode field by field
    // (see `AuditRecord`), so damaged fields degrade instead of hiding the
    // whole entry from the trail and the accountant.
    #[serde(default)]
    logs: Vec<Value>,
}

pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (or create) the state file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };

        if !store.path.exists() {
            if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    GuardrailsError::Storage(format!("create {} failed: {e}", parent.display()))
                })?;
            }
            store.write_state(&StateFile::default())?;
            tracing::info!(path = %store.path.display(), "created state file");
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| GuardrailsError::Storage("state lock poisoned".into()))
    }

    fn read_state(&self) -> Result<StateFile> {
        let s = fs::read_to_string(&self.path).map_err(|e| {
            GuardrailsError::Storage(format!("read {} failed: {e}", self.path.display()))
        })?;
        Ok(serde_json::from_str(&s)?)
    }

    fn write_state(&self, state: &StateFile) -> Result<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let body = serde_json::to_vec_pretty(state)?;
        let write = || -> std::io::Result<()> {
            let mut f = File::create(&tmp)?;
            f.write_all(&body)?;
            f.sync_all()?;
            fs::rename(&tmp, &self.path)
        };
        write().map_err(|e| {
            GuardrailsError::Storage(format!("write {} failed: {e}", self.path.display()))
        })
    }
}

impl StateStore for JsonFileStore {
    fn save_policy(&self, policy: &AgentPolicy) -> Result<()> {
        let _g = self.guard()?;
        let mut state = self.read_state()?;
        state
            .agents
            .insert(policy.agent_id.clone(), serde_json::to_value(policy)?);
        self.write_state(&state)
    }

    fn load_policy(&self, agent_id: &str) -> Result<Option<AgentPolicy>> {
        let _g = self.guard()?;
        let mut state = self.read_state()?;
        match state.agents.remove(agent_id) {
            Some(v) => Ok(Some(serde_json::from_value(v)?)),
            None => Ok(None),
        }
    }

    fn append_record(&self, record: &AuditRecord) -> Result<()> {
        let _g = self.guard()?;
        let mut state = self.read_state()?;
        state.logs.push(serde_json::to_value(record)?);
        self.write_state(&state)
    }

    fn get_records(&self, agent_id: &str, limit: Option<usize>) -> Result<Vec<AuditRecord>> {
        let _g = self.guard()?;
        let state = self.read_state()?;

        let records = state
            .logs
            .into_iter()
            .filter(|v| v.get("agent_id").and_then(Value::as_str) == Some(agent_id))
            .filter_map(|v| match serde_json::from_value::<AuditRecord>(v) {
                Ok(r) => Some(r),
                Err(e) => {
                    tracing::warn!(agent = %agent_id, error = %e, "skipping malformed audit entry");
                    None
                }
            })
            .collect();

        Ok(tail(records, limit))
    }
}
