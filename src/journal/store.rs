//! Live entry store: append, list, remove.
//!
//! Live entries are the not-yet-archived utterances. They are append-only
//! until the archival transition ([`crate::journal::archive`]) folds them
//! into a day batch and removes them.

use rusqlite::{params, Connection};

use crate::error::{JournalError, Result};
use crate::journal::types::VoiceLogEntry;
use crate::journal::{bounds_of_day, day_bounds};

/// Append a live entry. Returns the new entry id.
///
/// `Validation` error when the text is empty (or whitespace only, which a
/// speech-to-text front end will happily produce).
pub fn append_entry(
    conn: &Connection,
    owner_key: &str,
    text: &str,
    captured_at: i64,
) -> Result<String> {
    if text.trim().is_empty() {
        return Err(JournalError::Validation("entry text is empty".into()));
    }

    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO voice_logs (id, owner_key, text, captured_at) VALUES (?1, ?2, ?3, ?4)",
        params![id, owner_key, text, captured_at],
    )?;

    tracing::debug!(owner = %owner_key, entry = %id, "appended live entry");
    Ok(id)
}

/// Today's live entries for an owner, ascending by capture time.
///
/// "Today" is the UTC day containing `now_ms`; the caller injects the clock
/// so tests can pin it.
pub fn list_today(conn: &Connection, owner_key: &str, now_ms: i64) -> Result<Vec<VoiceLogEntry>> {
    let (start, end) = day_bounds(now_ms);
    list_range(conn, owner_key, start, end)
}

/// Live entries for an arbitrary `YYYY-MM-DD` day.
pub fn list_day(conn: &Connection, owner_key: &str, day: &str) -> Result<Vec<VoiceLogEntry>> {
    let (start, end) = bounds_of_day(day)?;
    list_range(conn, owner_key, start, end)
}

/// All live entries for an owner, ascending by capture time. Used by the
/// archival transition.
pub fn list_all(conn: &Connection, owner_key: &str) -> Result<Vec<VoiceLogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, owner_key, text, captured_at FROM voice_logs \
         WHERE owner_key = ?1 ORDER BY captured_at ASC, id ASC",
    )?;
    let entries = stmt
        .query_map(params![owner_key], row_to_entry)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}

/// Remove a live entry by id. Idempotent: removing an id that is already
/// gone is a no-op, not an error.
pub fn remove_entry(conn: &Connection, entry_id: &str) -> Result<()> {
    conn.execute("DELETE FROM voice_logs WHERE id = ?1", params![entry_id])?;
    Ok(())
}

fn list_range(
    conn: &Connection,
    owner_key: &str,
    start_ms: i64,
    end_ms: i64,
) -> Result<Vec<VoiceLogEntry>> {
    // Entry ids are UUID v7, so the id tie-break reproduces insertion order
    // for entries captured in the same millisecond.
    let mut stmt = conn.prepare(
        "SELECT id, owner_key, text, captured_at FROM voice_logs \
         WHERE owner_key = ?1 AND captured_at >= ?2 AND captured_at < ?3 \
         ORDER BY captured_at ASC, id ASC",
    )?;
    let entries = stmt
        .query_map(params![owner_key, start_ms, end_ms], row_to_entry)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<VoiceLogEntry> {
    Ok(VoiceLogEntry {
        id: row.get(0)?,
        owner_key: row.get(1)?,
        text: row.get(2)?,
        captured_at: row.get(3)?,
    })
}
