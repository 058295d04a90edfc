//! Read-side interface handed to the delivery surfaces.
//!
//! Thin delegation over the live and archive stores, plus the ownership check
//! on single-batch fetches: a batch that exists but belongs to someone else
//! is indistinguishable from one that does not exist.

use rusqlite::Connection;

use crate::error::Result;
use crate::journal::types::{ArchiveBatch, ArchivedDay, VoiceLogEntry};
use crate::journal::{archive, store};

/// Today's live (not yet archived) entries, ascending by capture time.
pub fn live_today(conn: &Connection, owner_key: &str, now_ms: i64) -> Result<Vec<VoiceLogEntry>> {
    store::list_today(conn, owner_key, now_ms)
}

/// Live entries for an arbitrary day.
pub fn live_day(conn: &Connection, owner_key: &str, day: &str) -> Result<Vec<VoiceLogEntry>> {
    store::list_day(conn, owner_key, day)
}

/// Archived days for an owner, newest first.
pub fn archived_days(conn: &Connection, owner_key: &str) -> Result<Vec<ArchivedDay>> {
    archive::list_days(conn, owner_key)
}

/// A single archived day, `None` when the batch does not exist or is not
/// owned by the caller. Soft not-found, never an error.
pub fn archived_day(
    conn: &Connection,
    batch_id: &str,
    owner_key: &str,
) -> Result<Option<ArchiveBatch>> {
    match archive::get_batch(conn, batch_id)? {
        Some(batch) if batch.owner_key == owner_key => Ok(Some(batch)),
        _ => Ok(None),
    }
}
