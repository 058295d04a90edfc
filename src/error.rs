//! The typed error shared by the journal, identity, and server layers.

use thiserror::Error;

/// Everything a journal operation can fail with.
///
/// `Validation` and `Auth` are caller mistakes and map to 4xx responses;
/// `Store` and `Corrupt` are infrastructure failures and map to 500. Soft
/// not-found (an archive day that does not exist or is not yours) is not an
/// error: those operations return `Option`.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Caller-supplied data fails a precondition. Never retried.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Caller identity missing, unresolved, or not the resource owner.
    #[error("authorization failed: {0}")]
    Auth(String),

    /// The underlying SQLite call failed.
    #[error("storage error: {0}")]
    Store(#[from] rusqlite::Error),

    /// A persisted archive batch holds entries that no longer decode.
    #[error("corrupt archive entries: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JournalError>;
