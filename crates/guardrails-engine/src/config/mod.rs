//! Guardrails config loader (strict parsing).

pub mod schema;

use std::fs;

use guardrails_core::error::{GuardrailsError, Result};

pub use schema::{AgentSeed, AllowSeed, GuardrailsConfig, LimitSeed, StorageBackend, StorageSection};

pub fn load_from_file(path: &str) -> Result<GuardrailsConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| GuardrailsError::BadConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GuardrailsConfig> {
    let cfg: GuardrailsConfig = serde_yaml::from_str(s)
        .map_err(|e| GuardrailsError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
