pub mod doctor;
pub mod journal;
pub mod owners;

use chrono::{DateTime, Utc};

/// Render a millisecond instant as UTC `HH:MM:SS` for listing output.
pub(crate) fn fmt_time(instant_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(instant_ms)
        .unwrap_or_default()
        .format("%H:%M:%S")
        .to_string()
}

/// Render a millisecond instant as a full UTC timestamp.
pub(crate) fn fmt_instant(instant_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(instant_ms)
        .unwrap_or_default()
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}
