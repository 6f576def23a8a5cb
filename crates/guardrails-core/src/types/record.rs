use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::params::{resolve_asset, Params};

/// One authorization decision, as written to the audit log.
///
/// Records are never mutated once appended. Limits are derived from the
/// `allowed` records, so `params` is stored exactly as the caller sent it.
///
/// Decoding is per field: a damaged field degrades to a neutral value
/// instead of losing the record. A timestamp that does not parse becomes
/// `None`; such records stay in the trail but never count toward a limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    pub agent_id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub action_type: String,
    #[serde(default, deserialize_with = "lenient::params")]
    pub params: Params,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub allowed: bool,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub reason: Option<String>,
}

impl AuditRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        agent_id: impl Into<String>,
        action_type: impl Into<String>,
        params: Params,
        allowed: bool,
        reason: Option<String>,
    ) -> Self {
        Self {
            timestamp: Some(timestamp),
            agent_id: agent_id.into(),
            action_type: action_type.into(),
            params,
            allowed,
            reason,
        }
    }

    /// Spent asset: `params.asset`, else `params.token`.
    pub fn asset(&self) -> Option<&str> {
        resolve_asset(&self.params)
    }

    /// `None` when absent or unparsable.
    pub fn amount(&self) -> Option<Decimal> {
        self.params.get("amount").and_then(|v| v.to_decimal())
    }
}

mod lenient {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::types::params::{ParamValue, Params};

    pub fn timestamp<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            _ => None,
        })
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        })
    }

    pub fn params<'de, D: Deserializer<'de>>(d: D) -> Result<Params, D::Error> {
        let Value::Object(map) = Value::deserialize(d)? else {
            return Ok(Params::new());
        };
        Ok(map
            .into_iter()
            .map(|(k, v)| {
                let v = serde_json::from_value(v.clone()).unwrap_or(ParamValue::Other(v));
                (k, v)
            })
            .collect())
    }

    // Anything that is not plainly `false`/absent counts as allowed, so a
    // damaged flag can only make accounting stricter.
    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::Null => false,
            _ => true,
        })
    }
}
