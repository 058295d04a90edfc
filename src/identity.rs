//! Token-to-owner resolution.
//!
//! The journal scopes every row to an owner key; this module is the only
//! place a caller credential (a bearer token) turns into one. Registration
//! mints the token; resolution looks it up. Unknown or blank tokens are an
//! `Auth` error with no partial data.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{JournalError, Result};

/// Register an owner and mint their access token. Returns the token.
///
/// `Validation` error when the owner key is empty or already registered.
pub fn register_owner(
    conn: &Connection,
    owner_key: &str,
    display_name: &str,
    created_at: i64,
) -> Result<String> {
    if owner_key.trim().is_empty() {
        return Err(JournalError::Validation("owner key is empty".into()));
    }

    let exists: Option<String> = conn
        .query_row(
            "SELECT owner_key FROM owners WHERE owner_key = ?1",
            params![owner_key],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_some() {
        return Err(JournalError::Validation(format!(
            "owner already registered: {owner_key}"
        )));
    }

    let token = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO owners (owner_key, display_name, token, created_at) \
         VALUES (?1, ?2, ?3, ?4)",
        params![owner_key, display_name, token, created_at],
    )?;

    tracing::info!(owner = %owner_key, "registered owner");
    Ok(token)
}

/// Resolve a bearer token to its owner key.
pub fn resolve_owner(conn: &Connection, token: &str) -> Result<String> {
    if token.is_empty() {
        return Err(JournalError::Auth("missing access token".into()));
    }

    conn.query_row(
        "SELECT owner_key FROM owners WHERE token = ?1",
        params![token],
        |row| row.get(0),
    )
    .optional()?
    .ok_or_else(|| JournalError::Auth("unknown access token".into()))
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
    fn register_then_resolve_round_trips() {
        let conn = test_db();
        let token = register_owner(&conn, "u1", "Rose", T0).unwrap();
        assert_eq!(resolve_owner(&conn, &token).unwrap(), "u1");
    }

    #[test]
    fn unknown_token_is_auth_error() {
        let conn = test_db();
        let err = resolve_owner(&conn, "bogus").unwrap_err();
        assert!(matches!(err, JournalError::Auth(_)));
    }

    #[test]
    fn empty_token_is_auth_error() {
        let conn = test_db();
        let err = resolve_owner(&conn, "").unwrap_err();
        assert!(matches!(err, JournalError::Auth(_)));
    }

    #[test]
    fn duplicate_registration_rejected() {
        let conn = test_db();
        register_owner(&conn, "u1", "Rose", T0).unwrap();
        let err = register_owner(&conn, "u1", "Rose again", T0).unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));
    }

    #[test]
    fn tokens_scope_to_their_own_owner() {
        let conn = test_db();
        let t1 = register_owner(&conn, "u1", "Rose", T0).unwrap();
        let t2 = register_owner(&conn, "u2", "Amir", T0).unwrap();
        assert_eq!(resolve_owner(&conn, &t1).unwrap(), "u1");
        assert_eq!(resolve_owner(&conn, &t2).unwrap(), "u2");
    }
}
