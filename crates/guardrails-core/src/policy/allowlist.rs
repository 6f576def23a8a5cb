//! Allowlist matching.
//!
//! Default-deny: an action type with no rule at all is never allowed. Within
//! one rule every constraint must hold; across rules any match suffices.

use crate::types::{AllowRule, Params};

pub fn is_allowed(action_type: &str, params: &Params, rules: &[AllowRule]) -> bool {
    rules
        .iter()
        .filter(|r| r.action_type == action_type)
        .any(|r| rule_matches(r, params))
}

/// A rule with no constraints matches any params.
pub fn rule_matches(rule: &AllowRule, params: &Params) -> bool {
    rule.constraints.iter().all(|(key, expected)| match params.get(key) {
        Some(actual) => actual.loose_eq(expected),
        None => false,
    })
}
