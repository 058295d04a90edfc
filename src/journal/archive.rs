//! Archive store and the archival transition.
//!
//! [`archive_today`] is the core state transition: it folds an owner's live
//! entries for the current day into one immutable [`ArchiveBatch`] and
//! removes the originals. The whole fold runs inside a single SQLite
//! transaction, and an existing batch for the day is merged into rather than
//! duplicated, so the one-batch-per-day rule holds even across crashes and
//! racing triggers (two clients both reacting to midnight).

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::error::Result;
use crate::journal::types::{ArchiveBatch, ArchivedDay};
use crate::journal::{day_of, parse_day, store};

/// Result returned from an archival run.
#[derive(Debug, Serialize)]
pub struct ArchiveOutcome {
    /// Number of live entries folded into the batch. Zero means no-op.
    pub archived_count: usize,
    /// Id of the batch written to (or merged into). `None` on a no-op.
    pub batch_id: Option<String>,
    /// The UTC day that was archived.
    pub day: String,
}

/// Fold the owner's live entries for the day containing `now_ms` into that
/// day's archive batch, then delete them from the live store.
///
/// The caller injects the clock; the function never reads system time. An
/// empty day is a no-op: a batch always represents at least one utterance.
/// Re-running on a day that already has a batch appends the newly captured
/// texts to the existing batch in capture order.
///
/// Merge policy: batches store texts only, so a merge appends in archival-run
/// order, sorted by capture time within each run. An entry inserted with a
/// backdated `captured_at` after the day already archived (possible through
/// this API; the HTTP and CLI surfaces always capture at "now") therefore
/// lands after the earlier run's texts, not interleaved by timestamp.
pub fn archive_today(conn: &mut Connection, owner_key: &str, now_ms: i64) -> Result<ArchiveOutcome> {
    let day = day_of(now_ms);
    let tx = conn.transaction()?;

    // Equivalent to listing all live entries and keeping those whose
    // day_of(captured_at) == day, already sorted ascending.
    let todays = store::list_today(&tx, owner_key, now_ms)?;
    if todays.is_empty() {
        return Ok(ArchiveOutcome {
            archived_count: 0,
            batch_id: None,
            day,
        });
    }

    let texts: Vec<String> = todays.iter().map(|e| e.text.clone()).collect();

    let existing: Option<(String, String)> = tx
        .query_row(
            "SELECT id, entries FROM daily_logs WHERE owner_key = ?1 AND day = ?2",
            params![owner_key, day],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let batch_id = match existing {
        Some((id, entries_json)) => {
            let mut entries: Vec<String> = serde_json::from_str(&entries_json)?;
            entries.extend(texts);
            tx.execute(
                "UPDATE daily_logs SET entries = ?1 WHERE id = ?2",
                params![serde_json::to_string(&entries)?, id],
            )?;
            tracing::info!(owner = %owner_key, %day, batch = %id, "merged into existing day batch");
            id
        }
        None => write_batch(&tx, owner_key, &day, &texts, now_ms)?,
    };

    for entry in &todays {
        store::remove_entry(&tx, &entry.id)?;
    }

    tx.commit()?;
    tracing::info!(owner = %owner_key, %day, count = todays.len(), "archived live entries");

    Ok(ArchiveOutcome {
        archived_count: todays.len(),
        batch_id: Some(batch_id),
        day,
    })
}

/// Insert a new archive batch. Returns the batch id.
///
/// The unique `(owner_key, day)` index makes a second insert for the same day
/// fail; [`archive_today`] checks-then-merges instead of hitting it.
pub fn write_batch(
    conn: &Connection,
    owner_key: &str,
    day: &str,
    entries: &[String],
    created_at: i64,
) -> Result<String> {
    parse_day(day)?;

    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO daily_logs (id, owner_key, day, entries, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, owner_key, day, serde_json::to_string(entries)?, created_at],
    )?;
    Ok(id)
}

/// Days that have an archive batch for this owner, most recent day first.
pub fn list_days(conn: &Connection, owner_key: &str) -> Result<Vec<ArchivedDay>> {
    let mut stmt = conn.prepare(
        "SELECT day, id FROM daily_logs WHERE owner_key = ?1 ORDER BY day DESC",
    )?;
    let days = stmt
        .query_map(params![owner_key], |row| {
            Ok(ArchivedDay {
                day: row.get(0)?,
                batch_id: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(days)
}

/// Fetch a batch by id. `None` when it does not exist.
pub fn get_batch(conn: &Connection, batch_id: &str) -> Result<Option<ArchiveBatch>> {
    let row: Option<(String, String, String, String, i64)> = conn
        .query_row(
            "SELECT id, owner_key, day, entries, created_at FROM daily_logs WHERE id = ?1",
            params![batch_id],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            },
        )
        .optional()?;

    match row {
        Some((id, owner_key, day, entries_json, created_at)) => Ok(Some(ArchiveBatch {
            id,
            owner_key,
            day,
            entries: serde_json::from_str(&entries_json)?,
            created_at,
        })),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JournalError;
    use crate::journal::store::{append_entry, list_all, list_today};

    // 2024-01-01T08:00:00Z
    const T0: i64 = 1_704_096_000_000;
    // 2024-01-01T23:59:00Z
    const T_EOD: i64 = 1_704_153_540_000;
    const DAY_MS: i64 = 86_400_000;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::schema::init_schema(&conn).unwrap();
        crate::db::migrations::run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn archive_folds_todays_entries_in_order() {
        let mut conn = test_db();
        append_entry(&conn, "u1", "Had breakfast", T0).unwrap();
        append_entry(&conn, "u1", "Took a walk", T0 + 300_000).unwrap();

        let outcome = archive_today(&mut conn, "u1", T_EOD).unwrap();
        assert_eq!(outcome.archived_count, 2);
        assert_eq!(outcome.day, "2024-01-01");

        let batch = get_batch(&conn, outcome.batch_id.as_deref().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(batch.day, "2024-01-01");
        assert_eq!(batch.entries, vec!["Had breakfast", "Took a walk"]);
        assert_eq!(batch.created_at, T_EOD);

        // Live store is empty for today afterwards
        assert!(list_today(&conn, "u1", T_EOD).unwrap().is_empty());
    }

    #[test]
    fn archive_ignores_other_days_entries() {
        let mut conn = test_db();
        append_entry(&conn, "u1", "yesterday", T0 - DAY_MS).unwrap();
        append_entry(&conn, "u1", "today", T0).unwrap();

        let outcome = archive_today(&mut conn, "u1", T_EOD).unwrap();
        assert_eq!(outcome.archived_count, 1);

        // Yesterday's entry stays live until its own archival run
        let remaining = list_all(&conn, "u1").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].text, "yesterday");
    }

    #[test]
    fn empty_day_is_noop_without_batch() {
        let mut conn = test_db();
        let outcome = archive_today(&mut conn, "u1", T_EOD).unwrap();
        assert_eq!(outcome.archived_count, 0);
        assert!(outcome.batch_id.is_none());
        assert!(list_days(&conn, "u1").unwrap().is_empty());
    }

    #[test]
    fn second_run_with_nothing_pending_is_noop() {
        let mut conn = test_db();
        append_entry(&conn, "u1", "only entry", T0).unwrap();

        let first = archive_today(&mut conn, "u1", T_EOD).unwrap();
        assert_eq!(first.archived_count, 1);

        let second = archive_today(&mut conn, "u1", T_EOD).unwrap();
        assert_eq!(second.archived_count, 0);
        assert!(second.batch_id.is_none());
        assert_eq!(list_days(&conn, "u1").unwrap().len(), 1);
    }

    #[test]
    fn rearchive_merges_into_existing_batch() {
        let mut conn = test_db();
        append_entry(&conn, "u1", "morning", T0).unwrap();
        let first = archive_today(&mut conn, "u1", T0 + 1000).unwrap();

        append_entry(&conn, "u1", "evening", T0 + 3_600_000).unwrap();
        let second = archive_today(&mut conn, "u1", T_EOD).unwrap();

        assert_eq!(second.archived_count, 1);
        assert_eq!(second.batch_id, first.batch_id);

        let days = list_days(&conn, "u1").unwrap();
        assert_eq!(days.len(), 1);

        let batch = get_batch(&conn, &days[0].batch_id).unwrap().unwrap();
        assert_eq!(batch.entries, vec!["morning", "evening"]);
    }

    #[test]
    fn archive_is_owner_scoped() {
        let mut conn = test_db();
        append_entry(&conn, "u1", "mine", T0).unwrap();
        append_entry(&conn, "u2", "theirs", T0).unwrap();

        let outcome = archive_today(&mut conn, "u1", T_EOD).unwrap();
        assert_eq!(outcome.archived_count, 1);

        // u2's entry is untouched
        assert_eq!(list_today(&conn, "u2", T_EOD).unwrap().len(), 1);
        assert!(list_days(&conn, "u2").unwrap().is_empty());
    }

    #[test]
    fn list_days_newest_first() {
        let conn = test_db();
        write_batch(&conn, "u1", "2024-01-01", &["a".into()], T0).unwrap();
        write_batch(&conn, "u1", "2024-01-03", &["c".into()], T0 + 2 * DAY_MS).unwrap();
        write_batch(&conn, "u1", "2024-01-02", &["b".into()], T0 + DAY_MS).unwrap();

        let days: Vec<String> = list_days(&conn, "u1")
            .unwrap()
            .into_iter()
            .map(|d| d.day)
            .collect();
        assert_eq!(days, vec!["2024-01-03", "2024-01-02", "2024-01-01"]);
    }

    #[test]
    fn write_batch_rejects_malformed_day() {
        let conn = test_db();
        let err = write_batch(&conn, "u1", "jan 1st", &["a".into()], T0).unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));
    }

    #[test]
    fn get_batch_missing_is_none() {
        let conn = test_db();
        assert!(get_batch(&conn, "no-such-batch").unwrap().is_none());
    }
}
