//! Daily free-text summaries, one per owner per day.
//!
//! A summary sits beside the day's archive batch (a caretaker's recap, or a
//! generated digest). Saving twice for the same day replaces the text.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{JournalError, Result};
use crate::journal::parse_day;
use crate::journal::types::DailySummary;

/// Upsert the summary for `(owner_key, day)`. Returns the summary id.
pub fn save_summary(
    conn: &Connection,
    owner_key: &str,
    day: &str,
    summary: &str,
    created_at: i64,
) -> Result<String> {
    parse_day(day)?;
    if summary.trim().is_empty() {
        return Err(JournalError::Validation("summary text is empty".into()));
    }

    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO daily_summaries (id, owner_key, day, summary, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         ON CONFLICT(owner_key, day) DO UPDATE SET summary = ?4, created_at = ?5",
        params![id, owner_key, day, summary, created_at],
    )?;

    // On the update path the original row id survives
    let id: String = conn.query_row(
        "SELECT id FROM daily_summaries WHERE owner_key = ?1 AND day = ?2",
        params![owner_key, day],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// The summary for `(owner_key, day)`, `None` if never saved.
pub fn get_summary(conn: &Connection, owner_key: &str, day: &str) -> Result<Option<DailySummary>> {
    parse_day(day)?;
    let summary = conn
        .query_row(
            "SELECT id, owner_key, day, summary, created_at FROM daily_summaries \
             WHERE owner_key = ?1 AND day = ?2",
            params![owner_key, day],
            |row| {
                Ok(DailySummary {
                    id: row.get(0)?,
                    owner_key: row.get(1)?,
                    day: row.get(2)?,
                    summary: row.get(3)?,
                    created_at: row.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_704_096_000_000;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::schema::init_schema(&conn).unwrap();
        crate::db::migrations::run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn save_and_get_summary() {
        let conn = test_db();
        save_summary(&conn, "u1", "2024-01-01", "A calm day", T0).unwrap();

        let s = get_summary(&conn, "u1", "2024-01-01").unwrap().unwrap();
        assert_eq!(s.summary, "A calm day");
        assert_eq!(s.created_at, T0);
    }

    #[test]
    fn save_twice_keeps_one_row_with_latest_text() {
        let conn = test_db();
        let id1 = save_summary(&conn, "u1", "2024-01-01", "draft", T0).unwrap();
        let id2 = save_summary(&conn, "u1", "2024-01-01", "final", T0 + 1000).unwrap();
        assert_eq!(id1, id2);

        let count: u32 = conn
            .query_row("SELECT COUNT(*) FROM daily_summaries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        let s = get_summary(&conn, "u1", "2024-01-01").unwrap().unwrap();
        assert_eq!(s.summary, "final");
    }

    #[test]
    fn summary_is_owner_scoped() {
        let conn = test_db();
        save_summary(&conn, "u1", "2024-01-01", "mine", T0).unwrap();
        assert!(get_summary(&conn, "u2", "2024-01-01").unwrap().is_none());
    }

    #[test]
    fn empty_summary_rejected() {
        let conn = test_db();
        let err = save_summary(&conn, "u1", "2024-01-01", "  ", T0).unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));
    }

    #[test]
    fn malformed_day_rejected() {
        let conn = test_db();
        let err = save_summary(&conn, "u1", "yesterday", "text", T0).unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));
    }
}
