//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use chrono::{DateTime, TimeZone, Utc};

use crate::Variant;
use crate::core::config::ChatConfig;
use crate::core::random::ScriptedRandom;
use crate::core::state::Session;

/// Fixed wall-clock instant for tests that don't care about time.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// Creates a session whose random source always returns `value`.
pub fn test_session(variant: Variant, value: f64) -> Session {
    test_session_with(variant, vec![value])
}

/// Creates a session that replays `values` for its random draws.
pub fn test_session_with(variant: Variant, values: Vec<f64>) -> Session {
    Session::new(
        ChatConfig::for_variant(variant),
        Box::new(ScriptedRandom::new(values)),
    )
}
