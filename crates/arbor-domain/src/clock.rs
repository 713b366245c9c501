//! Platform clock conventions.
//!
//! The platform displays times in UTC+8 and settles daily at midnight in
//! that zone, which is 16:00 UTC. Storage stays in UTC; only display
//! strings and cutoff computations apply the offset.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

/// Display timezone offset in hours.
pub const DISPLAY_OFFSET_HOURS: i64 = 8;

/// Format a storage timestamp for display in UTC+8.
///
/// Unparseable timestamps are passed through unchanged.
#[must_use]
pub fn display_time(iso: &str) -> String {
    match arbor_store::time::parse_iso(iso) {
        Some(dt) => (dt + Duration::hours(DISPLAY_OFFSET_HOURS))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => iso.to_string(),
    }
}

/// The most recent daily settlement boundary: 16:00 UTC (midnight UTC+8).
#[must_use]
pub fn daily_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    let shifted = now + Duration::hours(DISPLAY_OFFSET_HOURS);
    let midnight = shifted.date_naive().and_hms_opt(0, 0, 0).unwrap_or_default();
    Utc.from_utc_datetime(&midnight) - Duration::hours(DISPLAY_OFFSET_HOURS)
}

/// Start of the current month in the UTC+8 display zone, as a UTC instant.
#[must_use]
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let shifted = now + Duration::hours(DISPLAY_OFFSET_HOURS);
    let first = shifted
        .date_naive()
        .with_day0(0)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    Utc.from_utc_datetime(&first) - Duration::hours(DISPLAY_OFFSET_HOURS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn display_time_shifts_eight_hours() {
        assert_eq!(display_time("2026-03-15T20:30:00Z"), "2026-03-16 04:30:00");
    }

    #[test]
    fn display_time_passes_through_garbage() {
        assert_eq!(display_time("not-a-time"), "not-a-time");
    }

    #[test]
    fn cutoff_before_sixteen_utc_is_yesterday() {
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 10, 0, 0).unwrap();
        let cutoff = daily_cutoff(now);
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2026, 3, 14, 16, 0, 0).unwrap());
    }

    #[test]
    fn cutoff_after_sixteen_utc_is_today() {
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 20, 0, 0).unwrap();
        let cutoff = daily_cutoff(now);
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2026, 3, 15, 16, 0, 0).unwrap());
    }

    #[test]
    fn month_start_is_first_midnight_in_display_zone() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        let start = month_start(now);
        // Midnight UTC+8 on August 1st is 16:00 UTC on July 31st.
        assert_eq!(start.month(), 7);
        assert_eq!(start.day(), 31);
        assert_eq!(start.hour(), 16);
    }
}
