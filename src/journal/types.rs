//! Core journal record types.
//!
//! Defines [`VoiceLogEntry`] (a live utterance), [`ArchiveBatch`] (the
//! immutable daily rollup), [`ArchivedDay`] (a day listing row), and
//! [`DailySummary`].

use serde::{Deserialize, Serialize};

/// A live voice-log entry, matching the `voice_logs` table schema.
///
/// Immutable once created; destroyed exactly once, when the archival
/// transition folds its text into an [`ArchiveBatch`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceLogEntry {
    /// UUID v7 (time-sortable) primary key.
    pub id: String,
    /// Owner this entry belongs to.
    pub owner_key: String,
    /// The utterance content. Never empty.
    pub text: String,
    /// Capture instant, milliseconds since epoch.
    pub captured_at: i64,
}

/// An archived day of utterances, matching the `daily_logs` table schema.
///
/// At most one batch exists per `(owner_key, day)`. The `entries` keep the
/// chronological capture order of the original live entries; the original
/// entry ids are not preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveBatch {
    /// UUID v7 primary key.
    pub id: String,
    /// Owner this batch belongs to.
    pub owner_key: String,
    /// Calendar day, `YYYY-MM-DD` (UTC).
    pub day: String,
    /// Utterance texts in capture order.
    pub entries: Vec<String>,
    /// Instant the batch was written, milliseconds since epoch.
    pub created_at: i64,
}

/// One row of the archived-days listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivedDay {
    pub day: String,
    pub batch_id: String,
}

/// A free-text daily summary, one per `(owner_key, day)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub id: String,
    pub owner_key: String,
    pub day: String,
    pub summary: String,
    pub created_at: i64,
}
