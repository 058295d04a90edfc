pub mod archive;
pub mod retrieve;
pub mod store;
pub mod summary;
pub mod types;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::{JournalError, Result};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Calendar day of an instant, zero-padded `YYYY-MM-DD`, always UTC.
///
/// Every day bucketing decision in the crate goes through this function (or
/// the equivalent range from [`day_bounds`]), so an entry and the batch it is
/// folded into can never disagree about which day it belongs to.
pub fn day_of(instant_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(instant_ms)
        .unwrap_or_default()
        .format("%Y-%m-%d")
        .to_string()
}

/// Half-open `[start, end)` millisecond range of the UTC day containing the
/// instant. Filtering `captured_at` against this range is equivalent to
/// comparing `day_of(captured_at)` strings, but lets SQLite use the
/// `(owner_key, captured_at)` index.
pub fn day_bounds(instant_ms: i64) -> (i64, i64) {
    let date = DateTime::<Utc>::from_timestamp_millis(instant_ms)
        .unwrap_or_default()
        .date_naive();
    let start = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    (start, start + MILLIS_PER_DAY)
}

/// Parse a caller-supplied `YYYY-MM-DD` day string.
pub(crate) fn parse_day(day: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| JournalError::Validation(format!("invalid day (want YYYY-MM-DD): {day}")))
}

/// [`day_bounds`] for a caller-supplied day string. `Validation` error on a
/// malformed day.
pub(crate) fn bounds_of_day(day: &str) -> Result<(i64, i64)> {
    let date = parse_day(day)?;
    let start = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    Ok((start, start + MILLIS_PER_DAY))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_of_is_zero_padded_utc() {
        // 2024-01-01T08:00:00Z
        assert_eq!(day_of(1_704_096_000_000), "2024-01-01");
        // One millisecond before midnight stays on the same day
        assert_eq!(day_of(1_704_153_599_999), "2024-01-01");
        // Midnight rolls over
        assert_eq!(day_of(1_704_153_600_000), "2024-01-02");
    }

    #[test]
    fn day_bounds_cover_exactly_one_day() {
        let (start, end) = day_bounds(1_704_096_000_000);
        assert_eq!(day_of(start), "2024-01-01");
        assert_eq!(day_of(end - 1), "2024-01-01");
        assert_eq!(day_of(end), "2024-01-02");
        assert_eq!(end - start, MILLIS_PER_DAY);
    }

    #[test]
    fn same_day_instants_share_bounds() {
        let morning = 1_704_096_000_000; // 08:00Z
        let evening = 1_704_150_000_000; // 23:00Z
        assert_eq!(day_bounds(morning), day_bounds(evening));
    }

    #[test]
    fn parse_day_rejects_garbage() {
        assert!(parse_day("2024-01-01").is_ok());
        assert!(parse_day("01/01/2024").is_err());
        assert!(parse_day("2024-13-40").is_err());
        assert!(parse_day("").is_err());
    }
}
