use std::fmt;

use rust_decimal::Decimal;

/// Outcome of one authorization call.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Reason written to the audit record (`None` when allowed).
    pub fn reason(&self) -> Option<String> {
        match self {
            Decision::Allow => None,
            Decision::Deny(r) => Some(r.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DenyReason {
    /// No allow rule matched the action.
    NotAllowlisted,
    /// Spend would pass the configured cap.
    LimitExceeded {
        asset: String,
        cap: Decimal,
        window_seconds: u64,
    },
    /// Evaluation failed; fail closed.
    Error(String),
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::NotAllowlisted => f.write_str("action not in allowlist"),
            DenyReason::LimitExceeded { asset, cap, window_seconds } => {
                write!(f, "exceeds {asset} limit of {cap} per {window_seconds}s")
            }
            DenyReason::Error(detail) => write!(f, "authorization error: {detail}"),
        }
    }
}
