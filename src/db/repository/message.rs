use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{optional_timestamp_column, timestamp_column, uuid_column};
use crate::db::{format_timestamp, DatabaseError};
use crate::models::Message;

pub fn insert_message(conn: &Connection, message: &Message) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO messages (id, sender_id, recipient_id, subject, content, created_at, read_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            message.id.to_string(),
            message.sender_id.to_string(),
            message.recipient_id.to_string(),
            message.subject,
            message.content,
            format_timestamp(&message.created_at),
            message.read_at.as_ref().map(format_timestamp),
        ],
    )?;
    Ok(())
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: uuid_column(row, 0)?,
        sender_id: uuid_column(row, 1)?,
        recipient_id: uuid_column(row, 2)?,
        subject: row.get(3)?,
        content: row.get(4)?,
        created_at: timestamp_column(row, 5)?,
        read_at: optional_timestamp_column(row, 6)?,
    })
}

pub fn get_message(conn: &Connection, id: &Uuid) -> Result<Option<Message>, DatabaseError> {
    let message = conn
        .query_row(
            "SELECT id, sender_id, recipient_id, subject, content, created_at, read_at
             FROM messages WHERE id = ?1",
            params![id.to_string()],
            message_from_row,
        )
        .optional()?;
    Ok(message)
}

/// Inbox of one user, newest first.
pub fn list_messages_for_recipient(
    conn: &Connection,
    recipient_id: &Uuid,
    unread_only: bool,
) -> Result<Vec<Message>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, sender_id, recipient_id, subject, content, created_at, read_at
         FROM messages
         WHERE recipient_id = ?1 AND (?2 = 0 OR read_at IS NULL)
         ORDER BY created_at DESC",
    )?;
    let rows = stmt
        .query_map(
            params![recipient_id.to_string(), unread_only as i32],
            message_from_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Sets `read_at` unless already set. Returns the number of matched rows.
pub fn mark_message_read(
    conn: &Connection,
    id: &Uuid,
    read_at: &DateTime<Utc>,
) -> Result<usize, DatabaseError> {
    let updated = conn.execute(
        "UPDATE messages SET read_at = COALESCE(read_at, ?1) WHERE id = ?2",
        params![format_timestamp(read_at), id.to_string()],
    )?;
    Ok(updated)
}
