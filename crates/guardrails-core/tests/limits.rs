#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use guardrails_core::policy::{remaining_budget, spent_in_window, within_limit};
use guardrails_core::types::{to_params, AuditRecord, LimitConfig, ParamValue};

const AGENT: &str = "agent-1";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn usdc_100_per_day() -> LimitConfig {
    LimitConfig::new("USDC", dec("100"), 86_400).unwrap()
}

fn spend(at: DateTime<Utc>, key: &str, asset: &str, amount: &str, allowed: bool) -> AuditRecord {
    AuditRecord::new(
        at,
        AGENT,
        "swap",
        to_params([(key, asset), ("amount", amount)]),
        allowed,
        None,
    )
}

#[test]
fn boundary_is_inclusive() {
    let history = vec![spend(now() - Duration::hours(1), "token", "USDC", "60", true)];
    let limit = usdc_100_per_day();

    assert!(within_limit("USDC", dec("40"), &limit, &history, AGENT, now()));
    assert!(!within_limit("USDC", dec("40.01"), &limit, &history, AGENT, now()));
    assert!(!within_limit("USDC", dec("41"), &limit, &history, AGENT, now()));
}

#[test]
fn exact_decimal_arithmetic() {
    // 0.1 + 0.2 == 0.3 exactly
    let limit = LimitConfig::new("ETH", dec("0.3"), 3_600).unwrap();
    let history = vec![spend(now(), "asset", "ETH", "0.1", true)];
    assert!(within_limit("ETH", dec("0.2"), &limit, &history, AGENT, now()));
}

#[test]
fn denied_records_never_count() {
    let mut history = Vec::new();
    for _ in 0..10 {
        history.push(spend(now() - Duration::minutes(5), "token", "USDC", "500", false));
    }
    assert!(within_limit("USDC", dec("100"), &usdc_100_per_day(), &history, AGENT, now()));
}

#[test]
fn records_before_window_start_are_excluded() {
    let limit = usdc_100_per_day();
    let start = now() - Duration::seconds(86_400);

    let outside = vec![spend(start - Duration::seconds(1), "token", "USDC", "100", true)];
    assert!(within_limit("USDC", dec("100"), &limit, &outside, AGENT, now()));

    // exactly at window start still counts
    let edge = vec![spend(start, "token", "USDC", "100", true)];
    assert!(!within_limit("USDC", dec("1"), &limit, &edge, AGENT, now()));
}

#[test]
fn asset_resolves_from_asset_then_token() {
    let limit = usdc_100_per_day();
    let history = vec![
        spend(now(), "asset", "USDC", "30", true),
        spend(now(), "token", "USDC", "30", true),
        spend(now(), "token", "ETH", "1000", true),
    ];
    assert_eq!(
        spent_in_window("USDC", &limit, &history, AGENT, now()),
        Some(dec("60"))
    );
}

#[test]
fn other_agents_are_ignored() {
    let mut other = spend(now(), "token", "USDC", "100", true);
    other.agent_id = "agent-2".into();
    assert!(within_limit("USDC", dec("100"), &usdc_100_per_day(), &[other], AGENT, now()));
}

#[test]
fn unparsable_or_missing_amounts_contribute_nothing() {
    let mut history = vec![
        spend(now(), "token", "USDC", "lots", true),
        spend(now(), "token", "USDC", "50", true),
    ];
    let mut no_amount = spend(now(), "token", "USDC", "0", true);
    no_amount.params.remove("amount");
    history.push(no_amount);

    let mut numeric = spend(now(), "token", "USDC", "0", true);
    numeric.params.insert("amount".into(), ParamValue::from(25));
    history.push(numeric);

    assert_eq!(
        spent_in_window("USDC", &usdc_100_per_day(), &history, AGENT, now()),
        Some(dec("75"))
    );
}

#[test]
fn records_without_a_timestamp_are_excluded() {
    let mut undated = spend(now(), "token", "USDC", "100", true);
    undated.timestamp = None;
    assert!(within_limit("USDC", dec("100"), &usdc_100_per_day(), &[undated], AGENT, now()));
}

#[test]
fn asset_mismatch_is_denied() {
    assert!(!within_limit("ETH", dec("1"), &usdc_100_per_day(), &[], AGENT, now()));
}

#[test]
fn remaining_budget_floors_at_zero() {
    let limit = usdc_100_per_day();
    let history = vec![spend(now(), "token", "USDC", "70", true)];
    assert_eq!(remaining_budget(&limit, &history, AGENT, now()), dec("30"));

    let over = vec![spend(now(), "token", "USDC", "150", true)];
    assert_eq!(remaining_budget(&limit, &over, AGENT, now()), Decimal::ZERO);
}

#[test]
fn huge_window_covers_all_history() {
    let limit = LimitConfig::new("USDC", dec("100"), u64::MAX).unwrap();
    let history = vec![spend(now() - Duration::days(3650), "token", "USDC", "100", true)];
    assert!(!within_limit("USDC", dec("1"), &limit, &history, AGENT, now()));
}
