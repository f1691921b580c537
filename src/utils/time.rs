//! Time utilities
//!
//! The engine runs against a single canonical clock (UTC); there is no
//! per-tenant timezone handling.

use chrono::{NaiveDate, Utc};

/// Current Unix timestamp in seconds.
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Today's calendar date on the canonical clock.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
