//! Request parameters.
//!
//! Callers hand the engine a flat `Params` map. Values keep their JSON type
//! (text, number, bool) so they round-trip through the audit log unchanged,
//! while rule matching compares their string renderings. Any other JSON
//! value (null, arrays, objects) is carried as `Other` rather than failing
//! the whole map.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{GuardrailsError, Result};

/// Flat parameter map of a request (or of a rule's constraints).
pub type Params = BTreeMap<String, ParamValue>;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl ParamValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Exact decimal view of the value. Bools never convert.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            ParamValue::Text(s) => parse_decimal(s),
            ParamValue::Number(n) => parse_decimal(&n.to_string()),
            ParamValue::Bool(_) | ParamValue::Other(_) => None,
        }
    }

    /// Coercing equality: `10` and `"10"` are the same value, as are `true`
    /// and `"True"`.
    pub fn loose_eq(&self, other: &ParamValue) -> bool {
        self.coerced() == other.coerced()
    }

    fn coerced(&self) -> Cow<'_, str> {
        match self {
            ParamValue::Bool(true) => Cow::Borrowed("True"),
            ParamValue::Bool(false) => Cow::Borrowed("False"),
            ParamValue::Other(serde_json::Value::Null) => Cow::Borrowed("None"),
            ParamValue::Text(s) => Cow::Borrowed(s),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Number(n) => write!(f, "{n}"),
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Number(n.into())
    }
}

impl From<u64> for ParamValue {
    fn from(n: u64) -> Self {
        ParamValue::Number(n.into())
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Number(n.into())
    }
}

impl From<Decimal> for ParamValue {
    // Kept as text so the exact scale survives serialization.
    fn from(d: Decimal) -> Self {
        ParamValue::Text(d.to_string())
    }
}

/// Parse plain (`"12.50"`) or scientific (`"1e3"`) decimal text.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

/// Normalized view of request parameters.
///
/// Known keys are lifted into typed fields; everything else (including the
/// `token` alias) stays in `extra`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionRequest {
    pub asset: Option<String>,
    pub amount: Option<Decimal>,
    pub protocol: Option<String>,
    pub chain_id: Option<u64>,
    pub to_address: Option<String>,
    pub extra: Params,
}

impl ActionRequest {
    /// Strict normalization. Any structured field with the wrong type fails.
    pub fn from_params(params: &Params) -> Result<Self> {
        let mut out = ActionRequest::default();
        for (key, value) in params {
            match key.as_str() {
                "asset" => out.asset = Some(text_field(key, value)?),
                "protocol" => out.protocol = Some(text_field(key, value)?),
                "to_address" => out.to_address = Some(text_field(key, value)?),
                "amount" => {
                    let amount = value.to_decimal().ok_or_else(|| {
                        GuardrailsError::InvalidAmount(format!("unparsable amount: {value}"))
                    })?;
                    if amount < Decimal::ZERO {
                        return Err(GuardrailsError::InvalidAmount(format!(
                            "negative amount: {amount}"
                        )));
                    }
                    out.amount = Some(amount);
                }
                "chain_id" => {
                    let id = match value {
                        ParamValue::Number(n) => n.as_u64(),
                        ParamValue::Text(s) => s.trim().parse().ok(),
                        ParamValue::Bool(_) | ParamValue::Other(_) => None,
                    };
                    out.chain_id = Some(id.ok_or_else(|| {
                        GuardrailsError::InvalidParam(format!(
                            "chain_id must be an integer: {value}"
                        ))
                    })?);
                }
                _ => {
                    out.extra.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(out)
    }

    /// Lenient normalization: on failure every key lands in `extra`.
    pub fn normalize(params: &Params) -> Self {
        match Self::from_params(params) {
            Ok(req) => req,
            Err(e) => {
                tracing::debug!(error = %e, "param normalization failed, using overflow bag");
                ActionRequest {
                    extra: params.clone(),
                    ..Default::default()
                }
            }
        }
    }

    /// Asset this request spends: `asset`, else the `token` alias.
    pub fn resolved_asset<'a>(&'a self, raw: &'a Params) -> Option<&'a str> {
        self.asset
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| resolve_asset(raw))
    }
}

/// `asset`, falling back to `token`; empty strings do not count.
pub(crate) fn resolve_asset(params: &Params) -> Option<&str> {
    let pick = |k: &str| params.get(k).and_then(ParamValue::as_text).filter(|s| !s.is_empty());
    pick("asset").or_else(|| pick("token"))
}

fn text_field(key: &str, value: &ParamValue) -> Result<String> {
    value
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| GuardrailsError::InvalidParam(format!("{key} must be a string: {value}")))
}

/// Build a `Params` map from key/value pairs.
pub fn to_params<I, K, V>(pairs: I) -> Params
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<ParamValue>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
