//! Forward-only schema migration framework.
//!
//! Tracks the schema version in `schema_meta` and runs sequential migrations
//! to bring the database up to [`CURRENT_SCHEMA_VERSION`].

use rusqlite::{params, Connection};

use crate::error::Result;

/// The schema version that the current binary expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Get the current schema version from the database.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT value FROM schema_meta WHERE key = 'schema_version'",
        [],
        |row| {
            let val: String = row.get(0)?;
            Ok(val.parse::<u32>().unwrap_or(0))
        },
    )
}

/// Update the stored schema version.
fn update_schema_version(conn: &Connection, version: u32) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE schema_meta SET value = ?1 WHERE key = 'schema_version'",
        [version.to_string()],
    )?;
    Ok(())
}

/// Run any pending forward-only migrations. Each migration runs in a transaction.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let mut version = get_schema_version(conn)?;
    tracing::debug!(schema_version = version, target = CURRENT_SCHEMA_VERSION, "checking migrations");

    while version < CURRENT_SCHEMA_VERSION {
        let next = version + 1;
        tracing::info!(from = version, to = next, "running migration");

        let tx = conn.unchecked_transaction()?;
        match next {
            2 => migrate_v1_to_v2(&tx)?,
            _ => {
                tracing::error!(version = next, "unknown migration target");
                break;
            }
        }
        update_schema_version(&tx, next)?;
        tx.commit()?;

        version = next;
    }

    Ok(())
}

/// Migration v1 → v2: enforce one archive batch per `(owner_key, day)`.
///
/// Databases written before this version could accumulate duplicate day
/// batches when two archival runs raced each other. Duplicates are merged
/// oldest-batch-first into a single batch, the extras deleted, and then the
/// unique index is created so the constraint holds from here on.
fn migrate_v1_to_v2(conn: &Connection) -> Result<()> {
    let duplicated: Vec<(String, String)> = conn
        .prepare(
            "SELECT owner_key, day FROM daily_logs \
             GROUP BY owner_key, day HAVING COUNT(*) > 1",
        )?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    for (owner_key, day) in duplicated {
        let batches: Vec<(String, String)> = conn
            .prepare(
                "SELECT id, entries FROM daily_logs \
                 WHERE owner_key = ?1 AND day = ?2 \
                 ORDER BY created_at ASC, id ASC",
            )?
            .query_map(params![owner_key, day], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut merged: Vec<String> = Vec::new();
        for (_, entries_json) in &batches {
            merged.extend(serde_json::from_str::<Vec<String>>(entries_json)?);
        }

        let (keep_id, _) = &batches[0];
        conn.execute(
            "UPDATE daily_logs SET entries = ?1 WHERE id = ?2",
            params![serde_json::to_string(&merged)?, keep_id],
        )?;
        for (extra_id, _) in &batches[1..] {
            conn.execute("DELETE FROM daily_logs WHERE id = ?1", params![extra_id])?;
        }

        tracing::info!(owner = %owner_key, %day, merged = batches.len(), "merged duplicate day batches");
    }

    conn.execute_batch(
        "CREATE UNIQUE INDEX IF NOT EXISTS ux_daily_logs_owner_day ON daily_logs(owner_key, day);",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        crate::db::schema::init_schema(&conn).unwrap();
        conn
    }

    fn insert_batch(conn: &Connection, id: &str, owner: &str, day: &str, entries: &[&str], created_at: i64) {
        conn.execute(
            "INSERT INTO daily_logs (id, owner_key, day, entries, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, owner, day, serde_json::to_string(entries).unwrap(), created_at],
        )
        .unwrap();
    }

    #[test]
    fn get_schema_version_returns_1_on_fresh_db() {
        let conn = test_db();
        assert_eq!(get_schema_version(&conn).unwrap(), 1);
    }

    #[test]
    fn run_migrations_upgrades_to_current() {
        let conn = test_db();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = test_db();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap(); // second call should not error
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn migration_merges_duplicate_day_batches() {
        let conn = test_db();
        // Two batches for the same owner and day, the race artifact
        insert_batch(&conn, "b1", "u1", "2024-01-01", &["breakfast", "walk"], 100);
        insert_batch(&conn, "b2", "u1", "2024-01-01", &["dinner"], 200);
        // A clean batch that must survive untouched
        insert_batch(&conn, "b3", "u1", "2024-01-02", &["groceries"], 300);

        run_migrations(&conn).unwrap();

        let count: u32 = conn
            .query_row(
                "SELECT COUNT(*) FROM daily_logs WHERE owner_key = 'u1' AND day = '2024-01-01'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);

        let entries_json: String = conn
            .query_row(
                "SELECT entries FROM daily_logs WHERE owner_key = 'u1' AND day = '2024-01-01'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        let entries: Vec<String> = serde_json::from_str(&entries_json).unwrap();
        assert_eq!(entries, vec!["breakfast", "walk", "dinner"]);

        let other: String = conn
            .query_row(
                "SELECT entries FROM daily_logs WHERE day = '2024-01-02'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(other, r#"["groceries"]"#);
    }

    #[test]
    fn migration_installs_unique_day_index() {
        let conn = test_db();
        run_migrations(&conn).unwrap();

        insert_batch(&conn, "b1", "u1", "2024-01-01", &["a"], 100);
        let dup = conn.execute(
            "INSERT INTO daily_logs (id, owner_key, day, entries, created_at) \
             VALUES ('b2', 'u1', '2024-01-01', '[]', 200)",
            [],
        );
        assert!(dup.is_err());
    }
}
