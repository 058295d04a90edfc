//! CLI journal commands: append, archive, and the read-side listings.
//!
//! These operate directly on the local database as a trusted surface; the
//! HTTP API is where token auth happens. The `archive` command is also the
//! cron entry point for the midnight rollup, so its output stays one line.

use anyhow::Result;
use chrono::Utc;

use crate::cli::{fmt_instant, fmt_time};
use crate::config::DaybookConfig;
use crate::db;
use crate::journal::{retrieve, store, summary};

/// Append a live entry captured now.
pub fn append(config: &DaybookConfig, owner: &str, text: &str) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;
    let now_ms = Utc::now().timestamp_millis();
    let id = store::append_entry(&conn, owner, text, now_ms)?;
    println!("Appended entry {id}");
    Ok(())
}

/// Fold today's live entries into the day's archive batch.
pub fn archive(config: &DaybookConfig, owner: &str) -> Result<()> {
    let mut conn = db::open_database(config.resolved_db_path())?;
    let now_ms = Utc::now().timestamp_millis();
    let outcome = crate::journal::archive::archive_today(&mut conn, owner, now_ms)?;

    if outcome.archived_count == 0 {
        println!("Nothing to archive for {}", outcome.day);
    } else {
        println!(
            "Archived {} entries for {} into batch {}",
            outcome.archived_count,
            outcome.day,
            outcome.batch_id.as_deref().unwrap_or("?"),
        );
    }
    Ok(())
}

/// Print today's live entries.
pub fn today(config: &DaybookConfig, owner: &str) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;
    let now_ms = Utc::now().timestamp_millis();
    print_entries(&retrieve::live_today(&conn, owner, now_ms)?);
    Ok(())
}

/// Print live entries for an arbitrary day.
pub fn day(config: &DaybookConfig, owner: &str, day: &str) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;
    print_entries(&retrieve::live_day(&conn, owner, day)?);
    Ok(())
}

/// List archived days, newest first.
pub fn days(config: &DaybookConfig, owner: &str) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;
    let days = retrieve::archived_days(&conn, owner)?;

    if days.is_empty() {
        println!("No archived days.");
        return Ok(());
    }
    for d in days {
        println!("{}  {}", d.day, d.batch_id);
    }
    Ok(())
}

/// Print one archived day's entries.
pub fn show(config: &DaybookConfig, owner: &str, batch_id: &str) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;

    match retrieve::archived_day(&conn, batch_id, owner)? {
        Some(batch) => {
            println!("{} (archived {})", batch.day, fmt_instant(batch.created_at));
            for text in &batch.entries {
                println!("  - {text}");
            }
        }
        None => println!("No such archived day."),
    }
    Ok(())
}

/// Save the daily summary for a day.
pub fn summary_set(config: &DaybookConfig, owner: &str, day: &str, text: &str) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;
    let now_ms = Utc::now().timestamp_millis();
    summary::save_summary(&conn, owner, day, text, now_ms)?;
    println!("Saved summary for {day}");
    Ok(())
}

/// Print the daily summary for a day.
pub fn summary_get(config: &DaybookConfig, owner: &str, day: &str) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;
    match summary::get_summary(&conn, owner, day)? {
        Some(s) => println!("{}", s.summary),
        None => println!("No summary for {day}."),
    }
    Ok(())
}

fn print_entries(entries: &[crate::journal::types::VoiceLogEntry]) {
    if entries.is_empty() {
        println!("No entries.");
        return;
    }
    for e in entries {
        println!("{}  {}", fmt_time(e.captured_at), e.text);
    }
}
