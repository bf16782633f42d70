use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{enum_column, timestamp_column, uuid_column};
use crate::db::{format_timestamp, DatabaseError};
use crate::models::User;

pub fn insert_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (id, display_name, role, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            user.id.to_string(),
            user.display_name,
            user.role.as_str(),
            format_timestamp(&user.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_user(conn: &Connection, id: &Uuid) -> Result<Option<User>, DatabaseError> {
    let user = conn
        .query_row(
            "SELECT id, display_name, role, created_at FROM users WHERE id = ?1",
            params![id.to_string()],
            |row| {
                Ok(User {
                    id: uuid_column(row, 0)?,
                    display_name: row.get(1)?,
                    role: enum_column(row, 2)?,
                    created_at: timestamp_column(row, 3)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}

pub fn user_exists(conn: &Connection, id: &Uuid) -> Result<bool, DatabaseError> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM users WHERE id = ?1",
        params![id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists)
}
