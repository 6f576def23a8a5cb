//! Shared error type across guardrails crates.

use thiserror::Error;

/// Machine-readable error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Time window string did not match `<number><h|d>`.
    InvalidWindowFormat,
    /// Amount missing, unparsable or negative.
    InvalidAmount,
    /// Request parameter had the wrong type.
    InvalidParam,
    /// Limit configuration rejected (empty asset, non-positive cap).
    InvalidLimit,
    /// Allow rule rejected (empty action type).
    InvalidRule,
    /// No policy stored for the agent.
    AgentNotFound,
    /// Registration collided with an existing agent id.
    AgentExists,
    /// State store unavailable or failed.
    Storage,
    /// Stored data could not be encoded/decoded.
    Serialization,
    /// Configuration file rejected.
    BadConfig,
    /// Unsupported configuration version.
    UnsupportedVersion,
}

impl ErrorCode {
    /// String representation used in logs and test vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidWindowFormat => "INVALID_WINDOW_FORMAT",
            ErrorCode::InvalidAmount => "INVALID_AMOUNT",
            ErrorCode::InvalidParam => "INVALID_PARAM",
            ErrorCode::InvalidLimit => "INVALID_LIMIT",
            ErrorCode::InvalidRule => "INVALID_RULE",
            ErrorCode::AgentNotFound => "AGENT_NOT_FOUND",
            ErrorCode::AgentExists => "AGENT_EXISTS",
            ErrorCode::Storage => "STORAGE",
            ErrorCode::Serialization => "SERIALIZATION",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GuardrailsError>;

/// Unified error type used by core and engine.
#[derive(Debug, Error)]
pub enum GuardrailsError {
    #[error("invalid time window format: '{0}' (expected <number><h|d>, e.g. 24h, 7d)")]
    InvalidWindowFormat(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid param: {0}")]
    InvalidParam(String),
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    #[error("invalid rule: {0}")]
    InvalidRule(String),
    #[error("agent {0} not found in storage")]
    AgentNotFound(String),
    #[error("agent {0} already registered")]
    AgentExists(String),
    #[error("storage: {0}")]
    Storage(String),
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version: {0}")]
    UnsupportedVersion(u32),
}

impl GuardrailsError {
    /// Map error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            GuardrailsError::InvalidWindowFormat(_) => ErrorCode::InvalidWindowFormat,
            GuardrailsError::InvalidAmount(_) => ErrorCode::InvalidAmount,
            GuardrailsError::InvalidParam(_) => ErrorCode::InvalidParam,
            GuardrailsError::InvalidLimit(_) => ErrorCode::InvalidLimit,
            GuardrailsError::InvalidRule(_) => ErrorCode::InvalidRule,
            GuardrailsError::AgentNotFound(_) => ErrorCode::AgentNotFound,
            GuardrailsError::AgentExists(_) => ErrorCode::AgentExists,
            GuardrailsError::Storage(_) => ErrorCode::Storage,
            GuardrailsError::Serialization(_) => ErrorCode::Serialization,
            GuardrailsError::BadConfig(_) => ErrorCode::BadConfig,
            GuardrailsError::UnsupportedVersion(_) => ErrorCode::UnsupportedVersion,
        }
    }
}

impl From<serde_json::Error> for GuardrailsError {
    fn from(e: serde_json::Error) -> Self {
        GuardrailsError::Serialization(e.to_string())
    }
}
