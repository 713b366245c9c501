//! Timestamp helpers.
//!
//! All timestamps are stored as UTC strings in a fixed second-precision
//! format, so string comparison in SQL matches chronological order.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Storage timestamp format (UTC, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Current UTC time as a storage timestamp.
#[must_use]
pub fn now_iso() -> String {
    format_iso(Utc::now())
}

/// Format a UTC time as a storage timestamp.
#[must_use]
pub fn format_iso(dt: DateTime<Utc>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a storage timestamp back to a UTC time.
#[must_use]
pub fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
