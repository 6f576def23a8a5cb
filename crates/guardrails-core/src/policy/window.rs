//! Time window parsing (`24h`, `7d`).

use crate::error::{GuardrailsError, Result};

const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_DAY: u64 = 86_400;

/// Parse `<digits><h|d>` (case-insensitive) into seconds.
///
/// `"0h"` parses to 0; positivity is enforced where a limit is built.
pub fn parse_window(window: &str) -> Result<u64> {
    let invalid = || GuardrailsError::InvalidWindowFormat(window.to_string());

    let lower = window.to_ascii_lowercase();
    let unit = match lower.as_bytes().last() {
        Some(b'h') => SECS_PER_HOUR,
        Some(b'd') => SECS_PER_DAY,
        _ => return Err(invalid()),
    };

    let digits = &lower[..lower.len() - 1];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let n: u64 = digits.parse().map_err(|_| invalid())?;
    n.checked_mul(unit).ok_or_else(invalid)
}
