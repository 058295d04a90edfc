//! Voice journal with daily archival.
//!
//! Daybook stores a user's voice-note utterances as "live" entries during the
//! day and folds them into an immutable per-day archive batch at end of day
//! (or whenever the owner asks). Archival is a fold, not an append: each day
//! has at most one batch per owner, entries keep their capture order, and an
//! archived utterance never reappears in the live store.
//!
//! # Architecture
//!
//! - **Storage**: SQLite (WAL mode) with forward-only migrations; a unique
//!   `(owner_key, day)` index on the archive table enforces the
//!   one-batch-per-day rule at the storage layer.
//! - **Archival**: a single transaction reads today's live entries, writes
//!   (or merges into) the day's batch, and deletes the originals. A crash can
//!   never leave a batch behind with its source entries still live.
//! - **Identity**: bearer tokens resolve to owner keys; every query is scoped
//!   to the resolved owner.
//! - **Surfaces**: a JSON HTTP API (axum) and a CLI; the CLI `archive`
//!   subcommand doubles as the cron entry point for the midnight rollup.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite database initialization, schema, migrations, and health checks
//! - [`error`] — The typed journal error
//! - [`identity`] — Token-to-owner resolution
//! - [`journal`] — Core engine: append, archive, retrieve, and daily summaries
//! - [`server`] — HTTP API

pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod journal;
pub mod server;
