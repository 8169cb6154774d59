//! Ignore-window arithmetic
//!
//! The cutoff is `now - ignore_window_days`. CloudTrail is queried from the
//! cutoff instant; creation times are compared by UTC calendar date only.

use chrono::{DateTime, Duration, Utc};

/// Start of the ignore window
pub fn cutoff(now: DateTime<Utc>, ignore_window_days: u32) -> DateTime<Utc> {
    now - Duration::days(i64::from(ignore_window_days))
}

/// True when `created` falls on a calendar day strictly before the cutoff's day
pub fn created_before_cutoff(created: DateTime<Utc>, cutoff: DateTime<Utc>) -> bool {
    created.date_naive() < cutoff.date_naive()
}
