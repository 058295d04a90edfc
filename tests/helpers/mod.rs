#![allow(dead_code)]

use daybook::db;
use rusqlite::Connection;

/// 2024-01-01T08:00:00Z in milliseconds.
pub const T_BREAKFAST: i64 = 1_704_096_000_000;
/// 2024-01-01T08:05:00Z.
pub const T_WALK: i64 = 1_704_096_300_000;
/// 2024-01-01T23:59:00Z.
pub const T_END_OF_DAY: i64 = 1_704_153_540_000;
/// One calendar day in milliseconds.
pub const DAY_MS: i64 = 86_400_000;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    db::schema::init_schema(&conn).unwrap();
    db::migrations::run_migrations(&conn).unwrap();
    conn
}

/// Append a live entry, panicking on failure. Returns the entry id.
pub fn append(conn: &Connection, owner: &str, text: &str, captured_at: i64) -> String {
    daybook::journal::store::append_entry(conn, owner, text, captured_at).unwrap()
}
