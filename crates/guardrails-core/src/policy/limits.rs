//! Rolling-window limit accounting.
//!
//! Spend is never stored as a counter; it is recomputed from the audit log on
//! every check. Only `allowed` records count, so denied attempts never eat
//! into the budget. Records with an unparsable amount or timestamp contribute
//! nothing.
//!
//! Cost is a linear scan over the agent's history per check.

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;

use crate::types::{AuditRecord, LimitConfig};

/// Sum of allowed spend on `asset` for `agent_id` inside `[now - window, now]`.
///
/// Returns `None` if the sum overflows.
pub fn spent_in_window(
    asset: &str,
    limit: &LimitConfig,
    history: &[AuditRecord],
    agent_id: &str,
    now: DateTime<Utc>,
) -> Option<Decimal> {
    let window_start = window_start(now, limit.window_seconds);

    history
        .iter()
        .filter(|r| r.agent_id == agent_id && r.allowed)
        .filter(|r| r.timestamp.is_some_and(|t| t >= window_start))
        .filter(|r| r.asset() == Some(asset))
        .filter_map(AuditRecord::amount)
        .try_fold(Decimal::ZERO, |acc, amt| acc.checked_add(amt))
}

/// `(spent + amount) <= cap`. Inclusive at the boundary.
///
/// An asset that does not match the limit's asset is a sanity failure and
/// yields `false`, as does arithmetic overflow.
pub fn within_limit(
    asset: &str,
    amount: Decimal,
    limit: &LimitConfig,
    history: &[AuditRecord],
    agent_id: &str,
    now: DateTime<Utc>,
) -> bool {
    if asset != limit.asset {
        tracing::warn!(asset, limit_asset = %limit.asset, "limit asset mismatch");
        return false;
    }

    spent_in_window(asset, limit, history, agent_id, now)
        .and_then(|spent| spent.checked_add(amount))
        .is_some_and(|total| total <= limit.amount)
}

/// Unspent budget of `limit` at `now`, floored at zero.
pub fn remaining_budget(
    limit: &LimitConfig,
    history: &[AuditRecord],
    agent_id: &str,
    now: DateTime<Utc>,
) -> Decimal {
    match spent_in_window(&limit.asset, limit, history, agent_id, now) {
        Some(spent) if spent < limit.amount => limit.amount - spent,
        _ => Decimal::ZERO,
    }
}

// Windows too large to represent reach back to the beginning of time.
fn window_start(now: DateTime<Utc>, window_seconds: u64) -> DateTime<Utc> {
    i64::try_from(window_seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|d| now.checked_sub_signed(d))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
