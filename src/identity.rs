//! Bearer-token identity.
//!
//! Login flows belong to an external provider. This module only stores
//! users and sessions and resolves a presented token to a caller.

use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::db;
use crate::error::{require_text, AccessError};
use crate::models::enums::Role;
use crate::models::User;

/// Resolved identity of the caller, derived only from the session table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerContext {
    pub user_id: Uuid,
    pub role: Role,
}

/// SHA-256 of the token, URL-safe base64 without padding.
pub fn hash_token(token: &str) -> String {
    let digest: [u8; 32] = Sha256::digest(token.as_bytes()).into();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest)
}

/// Random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

pub fn create_user(conn: &Connection, display_name: &str, role: Role) -> Result<User, AccessError> {
    let user = User {
        id: Uuid::new_v4(),
        display_name: require_text(Some(display_name), "displayName")?,
        role,
        created_at: db::timestamp_now(),
    };
    db::insert_user(conn, &user)?;
    tracing::info!(user_id = %user.id, role = %user.role, "User created");
    Ok(user)
}

/// Issues a new session and returns the plaintext token. Only its hash
/// is stored. `ttl` of `None` never expires.
pub fn issue_session(
    conn: &Connection,
    user_id: &Uuid,
    ttl: Option<Duration>,
) -> Result<String, AccessError> {
    if !db::user_exists(conn, user_id)? {
        return Err(AccessError::NotFound {
            entity: "User",
            id: user_id.to_string(),
        });
    }

    let token = generate_token();
    let now = db::timestamp_now();
    let expires_at = ttl.map(|ttl| now + ttl);
    db::insert_session(conn, &hash_token(&token), user_id, &now, expires_at.as_ref())?;

    tracing::info!(%user_id, expires_at = ?expires_at, "Session issued");
    Ok(token)
}

pub fn resolve_caller(conn: &Connection, token: &str) -> Result<Option<CallerContext>, AccessError> {
    resolve_caller_at(conn, token, &Utc::now())
}

/// Looks up an unexpired session for `token` as of `now`.
pub fn resolve_caller_at(
    conn: &Connection,
    token: &str,
    now: &DateTime<Utc>,
) -> Result<Option<CallerContext>, AccessError> {
    let found = db::find_session_user(conn, &hash_token(token), now)?;
    Ok(found.map(|(user_id, role)| CallerContext { user_id, role }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    #[test]
    fn hash_is_deterministic_and_not_the_token() {
        let token = generate_token();
        assert_eq!(hash_token(&token), hash_token(&token));
        assert_ne!(hash_token(&token), token);
        assert_ne!(hash_token("a"), hash_token("b"));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
        assert_eq!(generate_token().len(), 43);
    }

    #[test]
    fn issued_token_resolves_to_caller() {
        let conn = test_db();
        let user = create_user(&conn, "Dr. Rivera", Role::Doctor).unwrap();
        let token = issue_session(&conn, &user.id, Some(Duration::hours(1))).unwrap();

        let caller = resolve_caller(&conn, &token).unwrap().unwrap();
        assert_eq!(caller.user_id, user.id);
        assert_eq!(caller.role, Role::Doctor);

        assert!(resolve_caller(&conn, "not-a-token").unwrap().is_none());
    }

    #[test]
    fn expired_session_does_not_resolve() {
        let conn = test_db();
        let user = create_user(&conn, "Sam", Role::Patient).unwrap();
        let token = issue_session(&conn, &user.id, Some(Duration::hours(1))).unwrap();

        let later = Utc::now() + Duration::hours(2);
        assert!(resolve_caller_at(&conn, &token, &later).unwrap().is_none());
    }

    #[test]
    fn session_for_unknown_user_is_rejected() {
        let conn = test_db();
        assert!(issue_session(&conn, &Uuid::new_v4(), None).is_err());
        assert!(create_user(&conn, "  ", Role::User).is_err());
    }
}
