//! SQL DDL for all Daybook tables.
//!
//! Defines the `voice_logs` (live entries), `daily_logs` (archive batches),
//! `daily_summaries`, `owners`, and `schema_meta` tables. All DDL uses
//! `IF NOT EXISTS` for idempotent initialization.
//!
//! The unique index on `daily_logs(owner_key, day)` is added by migration v2
//! (see [`crate::db::migrations`]) so that pre-index databases can be
//! deduplicated before the constraint lands.

use rusqlite::Connection;

/// Baseline (v1) schema DDL statements for Daybook's tables.
const SCHEMA_SQL: &str = r#"
-- Live voice-log entries, one row per utterance, removed on archival
CREATE TABLE IF NOT EXISTS voice_logs (
    id TEXT PRIMARY KEY,
    owner_key TEXT NOT NULL,
    text TEXT NOT NULL CHECK(length(text) > 0),
    captured_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_voice_logs_owner ON voice_logs(owner_key, captured_at);

-- Immutable daily archive batches; entries is a JSON array of utterance texts
CREATE TABLE IF NOT EXISTS daily_logs (
    id TEXT PRIMARY KEY,
    owner_key TEXT NOT NULL,
    day TEXT NOT NULL CHECK(length(day) = 10),
    entries TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_daily_logs_owner ON daily_logs(owner_key, day);

-- One free-text summary per owner per day
CREATE TABLE IF NOT EXISTS daily_summaries (
    id TEXT PRIMARY KEY,
    owner_key TEXT NOT NULL,
    day TEXT NOT NULL CHECK(length(day) = 10),
    summary TEXT NOT NULL CHECK(length(summary) > 0),
    created_at INTEGER NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS ux_daily_summaries_owner_day
    ON daily_summaries(owner_key, day);

-- Identity: bearer token to owner key
CREATE TABLE IF NOT EXISTS owners (
    owner_key TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    token TEXT NOT NULL UNIQUE,
    created_at INTEGER NOT NULL
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all baseline tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
