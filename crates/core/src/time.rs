//! Time source and timestamp formatting.
//!
//! Stored timestamps use ISO 8601 UTC with millisecond precision, e.g.
//! `2024-03-09T10:15:30.123Z`.

use std::sync::Mutex;

use chrono::{DateTime, Duration, DurationRound, SecondsFormat, Utc};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that returns a settable instant (useful for testing).
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Truncates an instant to whole milliseconds.
pub fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.duration_trunc(Duration::milliseconds(1)).unwrap_or(dt)
}

/// Formats an instant as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Formats an instant as RFC 3339 UTC keeping its full precision.
pub fn format_instant(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_has_millis_and_z() {
        let dt = parse_timestamp("2024-03-09T10:15:30.123456+02:00").unwrap();
        assert_eq!(format_timestamp(dt), "2024-03-09T08:15:30.123Z");
    }

    #[test]
    fn test_format_instant_keeps_precision() {
        let dt = parse_timestamp("2024-03-09T10:15:30.123456Z").unwrap();
        assert_eq!(format_instant(dt), "2024-03-09T10:15:30.123456Z");
        assert_eq!(parse_timestamp(&format_instant(dt)).unwrap(), dt);
    }

    #[test]
    fn test_truncate_to_millis() {
        let dt = parse_timestamp("2024-03-09T10:15:30.123999Z").unwrap();
        assert_eq!(
            truncate_to_millis(dt),
            parse_timestamp("2024-03-09T10:15:30.123Z").unwrap()
        );
    }

    #[test]
    fn test_fixed_clock_advance() {
        let start = parse_timestamp("2024-03-09T10:00:00Z").unwrap();
        let clock = FixedClock::new(start);
        clock.advance(Duration::hours(1));
        assert_eq!(clock.now(), start + Duration::hours(1));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
