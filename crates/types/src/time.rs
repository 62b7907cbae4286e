//! Wall-clock capability and timestamp encoding.
//!
//! Timestamps are persisted as RFC 3339 strings with millisecond precision
//! and a `Z` suffix (`2026-02-16T19:35:03.762Z`). The fixed width makes
//! lexicographic comparison in SQL agree with chronological order.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Source of "now" for expiry decisions.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Returns `from + ttl_minutes`.
pub fn expiry_after(from: DateTime<Utc>, ttl_minutes: u32) -> DateTime<Utc> {
    from + Duration::minutes(i64::from(ttl_minutes))
}

/// Encodes a timestamp in the persisted format.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Decodes a persisted timestamp.
///
/// # Errors
///
/// Returns [`chrono::ParseError`] if the value is not RFC 3339.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|ts| ts.with_timezone(&Utc))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_expiry_adds_minutes() {
        let now = Utc.with_ymd_and_hms(2026, 2, 16, 19, 0, 0).unwrap();
        assert_eq!(expiry_after(now, 60), Utc.with_ymd_and_hms(2026, 2, 16, 20, 0, 0).unwrap());
        assert_eq!(expiry_after(now, 1440), Utc.with_ymd_and_hms(2026, 2, 17, 19, 0, 0).unwrap());
    }

    #[test]
    fn test_format_is_fixed_width_millis() {
        let ts = Utc.with_ymd_and_hms(2026, 2, 16, 19, 35, 3).unwrap();
        assert_eq!(format_timestamp(ts), "2026-02-16T19:35:03.000Z");
    }

    #[test]
    fn test_parse_round_trips_format() {
        let raw = "2026-02-16T19:35:03.762Z";
        assert_eq!(format_timestamp(parse_timestamp(raw).unwrap()), raw);
    }

    #[test]
    fn test_lexicographic_order_matches_chronological() {
        let earlier = Utc.with_ymd_and_hms(2026, 2, 16, 9, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 2, 16, 10, 0, 0).unwrap();
        assert!(format_timestamp(earlier) < format_timestamp(later));
    }
}
