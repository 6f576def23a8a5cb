#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use rust_decimal::Decimal;

use guardrails_core::types::{
    to_params, ActionRequest, AgentPolicy, AgentProfile, AllowRule, AuditRecord, LimitConfig,
    ParamValue, Params,
};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn normalizes_known_fields() {
    let mut params = to_params([
        ("asset", "USDC"),
        ("amount", "12.50"),
        ("protocol", "UniswapV3"),
        ("to_address", "0xabc"),
        ("slippage", "0.5"),
    ]);
    params.insert("chain_id".into(), ParamValue::from(8453));

    let req = ActionRequest::from_params(&params).unwrap();
    assert_eq!(req.asset.as_deref(), Some("USDC"));
    assert_eq!(req.amount, Some(dec("12.50")));
    assert_eq!(req.protocol.as_deref(), Some("UniswapV3"));
    assert_eq!(req.chain_id, Some(8453));
    assert_eq!(req.to_address.as_deref(), Some("0xabc"));
    assert_eq!(req.extra.len(), 1);
    assert!(req.extra.contains_key("slippage"));
}

#[test]
fn token_stays_in_extra_but_resolves_as_asset() {
    let params = to_params([("token", "USDC"), ("amount", "1")]);
    let req = ActionRequest::normalize(&params);
    assert!(req.asset.is_none());
    assert!(req.extra.contains_key("token"));
    assert_eq!(req.resolved_asset(&params), Some("USDC"));
}

#[test]
fn amount_accepts_numbers_and_scientific_text() {
    let mut params = Params::new();
    params.insert("amount".into(), ParamValue::from(60));
    assert_eq!(ActionRequest::from_params(&params).unwrap().amount, Some(dec("60")));

    params.insert("amount".into(), ParamValue::from("1e3"));
    assert_eq!(ActionRequest::from_params(&params).unwrap().amount, Some(dec("1000")));

    let float: Params = serde_json::from_str(r#"{"amount": 0.25}"#).unwrap();
    assert_eq!(ActionRequest::from_params(&float).unwrap().amount, Some(dec("0.25")));
}

#[test]
fn bad_fields_fail_strict_and_fall_back_lenient() {
    let params = to_params([("amount", "ten"), ("protocol", "UniswapV3")]);
    let err = ActionRequest::from_params(&params).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_AMOUNT");

    let req = ActionRequest::normalize(&params);
    assert!(req.amount.is_none());
    assert!(req.protocol.is_none());
    assert_eq!(req.extra, params);

    let mut typed = Params::new();
    typed.insert("asset".into(), ParamValue::from(5));
    let err = ActionRequest::from_params(&typed).expect_err("asset must be text");
    assert_eq!(err.code().as_str(), "INVALID_PARAM");
}

#[test]
fn negative_amounts_are_rejected() {
    let params = to_params([("amount", "-5")]);
    let err = ActionRequest::from_params(&params).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_AMOUNT");
}

#[test]
fn param_values_keep_json_types() {
    let params: Params =
        serde_json::from_str(r#"{"a": "10", "b": 10, "c": true, "d": 1.5}"#).unwrap();
    assert_eq!(params["a"], ParamValue::Text("10".into()));
    assert!(matches!(params["b"], ParamValue::Number(_)));
    assert_eq!(params["c"], ParamValue::Bool(true));
    assert!(params["a"].loose_eq(&params["b"]));
    assert_eq!(params["d"].to_string(), "1.5");

    let back = serde_json::to_string(&params).unwrap();
    assert_eq!(back, r#"{"a":"10","b":10,"c":true,"d":1.5}"#);
}

#[test]
fn limit_validation() {
    assert!(LimitConfig::new("USDC", dec("100"), 3_600).is_ok());
    let cases = [("", "1", 1u64), ("USDC", "0", 1), ("USDC", "-1", 1), ("USDC", "1", 0)];
    for (asset, amount, window) in cases {
        let err = LimitConfig::new(asset, dec(amount), window).expect_err("must fail");
        assert_eq!(err.code().as_str(), "INVALID_LIMIT");
    }
}

#[test]
fn limit_amount_serializes_as_decimal_text() {
    let limit = LimitConfig::new("USDC", dec("100.10"), 86_400).unwrap();
    let v = serde_json::to_value(&limit).unwrap();
    assert_eq!(v["amount"], serde_json::json!("100.10"));
    let back: LimitConfig = serde_json::from_value(v).unwrap();
    assert_eq!(back, limit);
}

#[test]
fn policy_limits_are_last_write_wins_and_rules_append() {
    let mut policy = AgentPolicy::new(AgentProfile::new("a", "0x1")).unwrap();
    policy.set_limit(LimitConfig::new("USDC", dec("100"), 3_600).unwrap());
    policy.set_limit(LimitConfig::new("USDC", dec("50"), 7_200).unwrap());
    assert_eq!(policy.limits.len(), 1);
    assert_eq!(policy.limit_for("USDC").unwrap().amount, dec("50"));

    policy.add_rule(AllowRule::new("swap", Params::new()).unwrap());
    policy.add_rule(AllowRule::new("swap", Params::new()).unwrap());
    assert_eq!(policy.allow_rules.len(), 2);

    assert!(AllowRule::new("", Params::new()).is_err());
    assert!(AgentPolicy::new(AgentProfile::new("a", "")).is_err());
}

#[test]
fn audit_record_timestamp_is_utc_text() {
    let ts = chrono::DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    let rec = AuditRecord::new(ts, "a", "swap", to_params([("token", "USDC")]), true, None);
    let v = serde_json::to_value(&rec).unwrap();
    assert_eq!(v["timestamp"], serde_json::json!("2026-03-01T12:00:00Z"));
    let back: AuditRecord = serde_json::from_value(v).unwrap();
    assert_eq!(back, rec);
}

#[test]
fn non_scalar_values_are_carried_not_rejected() {
    let params: Params =
        serde_json::from_str(r#"{"memo": null, "route": ["a", "b"], "amount": "5"}"#).unwrap();
    assert_eq!(params["memo"], ParamValue::Other(serde_json::Value::Null));
    assert!(matches!(params["route"], ParamValue::Other(_)));
    assert_eq!(params["amount"].to_decimal(), Some(dec("5")));
    assert_eq!(params["memo"].to_decimal(), None);

    let back = serde_json::to_string(&params).unwrap();
    assert_eq!(back, r#"{"amount":"5","memo":null,"route":["a","b"]}"#);
}

#[test]
fn bools_coerce_like_their_capitalized_text() {
    let yes = ParamValue::Bool(true);
    assert!(yes.loose_eq(&ParamValue::from("True")));
    assert!(!yes.loose_eq(&ParamValue::from("true")));
    assert!(ParamValue::Bool(false).loose_eq(&ParamValue::from("False")));
}

#[test]
fn audit_record_decodes_field_by_field() {
    let raw = serde_json::json!({
        "timestamp": "not a time",
        "agent_id": "a",
        "action_type": 3,
        "params": { "token": "USDC", "amount": "60", "memo": null },
        "allowed": "yes",
        "reason": { "code": 1 }
    });
    let rec: AuditRecord = serde_json::from_value(raw).unwrap();
    assert_eq!(rec.timestamp, None);
    assert_eq!(rec.action_type, "3");
    assert_eq!(rec.asset(), Some("USDC"));
    assert_eq!(rec.amount(), Some(dec("60")));
    assert!(rec.allowed);
    assert_eq!(rec.reason.as_deref(), Some(r#"{"code":1}"#));

    let sparse: AuditRecord = serde_json::from_str(r#"{"agent_id": "a"}"#).unwrap();
    assert!(!sparse.allowed);
    assert!(sparse.params.is_empty());
    assert!(sparse.timestamp.is_none());
}
