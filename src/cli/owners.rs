//! CLI `owner` commands: register owners and list them.

use anyhow::Result;
use chrono::Utc;
use rusqlite::params;

use crate::cli::fmt_instant;
use crate::config::DaybookConfig;
use crate::db;
use crate::identity;

/// Register a new owner and print their access token (shown once).
pub fn add(config: &DaybookConfig, owner_key: &str, display_name: &str) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;
    let now_ms = Utc::now().timestamp_millis();
    let token = identity::register_owner(&conn, owner_key, display_name, now_ms)?;

    println!("Registered owner {owner_key}");
    println!("Access token: {token}");
    println!("Pass it as `Authorization: Bearer <token>` on API calls.");
    Ok(())
}

/// List registered owners.
pub fn list(config: &DaybookConfig) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;

    let mut stmt = conn.prepare(
        "SELECT owner_key, display_name, created_at FROM owners ORDER BY created_at ASC",
    )?;
    let owners: Vec<(String, String, i64)> = stmt
        .query_map(params![], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    if owners.is_empty() {
        println!("No owners registered. Run `daybook owner add <key>`.");
        return Ok(());
    }
    for (key, name, created_at) in owners {
        println!("{key}  {name}  (since {})", fmt_instant(created_at));
    }
    Ok(())
}
