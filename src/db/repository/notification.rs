use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{enum_column, optional_timestamp_column, timestamp_column, uuid_column};
use crate::db::{format_timestamp, DatabaseError};
use crate::models::Notification;

pub fn insert_notification(
    conn: &Connection,
    notification: &Notification,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO notifications (id, user_id, kind, title, body, created_at, read_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            notification.id.to_string(),
            notification.user_id.to_string(),
            notification.kind.as_str(),
            notification.title,
            notification.body,
            format_timestamp(&notification.created_at),
            notification.read_at.as_ref().map(format_timestamp),
        ],
    )?;
    Ok(())
}

pub fn list_notifications(
    conn: &Connection,
    user_id: &Uuid,
    unread_only: bool,
) -> Result<Vec<Notification>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, kind, title, body, created_at, read_at
         FROM notifications
         WHERE user_id = ?1 AND (?2 = 0 OR read_at IS NULL)
         ORDER BY created_at DESC",
    )?;
    let rows = stmt
        .query_map(params![user_id.to_string(), unread_only as i32], |row| {
            Ok(Notification {
                id: uuid_column(row, 0)?,
                user_id: uuid_column(row, 1)?,
                kind: enum_column(row, 2)?,
                title: row.get(3)?,
                body: row.get(4)?,
                created_at: timestamp_column(row, 5)?,
                read_at: optional_timestamp_column(row, 6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Marks every unread notification of one user as read. Returns the count changed.
pub fn mark_all_notifications_read(
    conn: &Connection,
    user_id: &Uuid,
    read_at: &DateTime<Utc>,
) -> Result<usize, DatabaseError> {
    let updated = conn.execute(
        "UPDATE notifications SET read_at = ?1 WHERE user_id = ?2 AND read_at IS NULL",
        params![format_timestamp(read_at), user_id.to_string()],
    )?;
    Ok(updated)
}
