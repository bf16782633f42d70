use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{enum_column, uuid_column};
use crate::db::{format_timestamp, DatabaseError};
use crate::models::enums::Role;

/// Store a session keyed by the hash of its bearer token.
/// The plaintext token is never written.
pub fn insert_session(
    conn: &Connection,
    token_hash: &str,
    user_id: &Uuid,
    created_at: &DateTime<Utc>,
    expires_at: Option<&DateTime<Utc>>,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            token_hash,
            user_id.to_string(),
            format_timestamp(created_at),
            expires_at.map(format_timestamp),
        ],
    )?;
    Ok(())
}

/// Resolve a token hash to its user and role, ignoring expired sessions.
pub fn find_session_user(
    conn: &Connection,
    token_hash: &str,
    now: &DateTime<Utc>,
) -> Result<Option<(Uuid, Role)>, DatabaseError> {
    let found = conn
        .query_row(
            "SELECT u.id, u.role
             FROM sessions s
             JOIN users u ON s.user_id = u.id
             WHERE s.token_hash = ?1
             AND (s.expires_at IS NULL OR s.expires_at > ?2)",
            params![token_hash, format_timestamp(now)],
            |row| Ok((uuid_column(row, 0)?, enum_column(row, 1)?)),
        )
        .optional()?;
    Ok(found)
}
