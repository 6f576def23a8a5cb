//! Policy layer (time windows, allowlists, spending limits).
//!
//! Pure functions only: the engine loads state, calls into here, and writes
//! the outcome back to the audit log.

pub mod allowlist;
pub mod limits;
pub mod window;

pub use allowlist::{is_allowed, rule_matches};
pub use limits::{remaining_budget, spent_in_window, within_limit};
pub use window::parse_window;
