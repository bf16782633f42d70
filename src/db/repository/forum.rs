use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{optional_uuid_column, timestamp_column, uuid_column};
use crate::db::{format_timestamp, DatabaseError};
use crate::models::Forum;

pub fn insert_forum(conn: &Connection, forum: &Forum) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO forums (id, name, description, condition_id, rules, is_private,
         created_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            forum.id.to_string(),
            forum.name,
            forum.description,
            forum.condition_id.map(|id| id.to_string()),
            forum.rules,
            forum.is_private as i32,
            forum.created_by.to_string(),
            format_timestamp(&forum.created_at),
        ],
    )?;
    Ok(())
}

fn forum_from_row(row: &Row<'_>) -> rusqlite::Result<Forum> {
    let is_private: i32 = row.get(5)?;
    Ok(Forum {
        id: uuid_column(row, 0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        condition_id: optional_uuid_column(row, 3)?,
        rules: row.get(4)?,
        is_private: is_private != 0,
        created_by: uuid_column(row, 6)?,
        created_at: timestamp_column(row, 7)?,
    })
}

pub fn list_forums(
    conn: &Connection,
    condition_id: Option<&Uuid>,
) -> Result<Vec<Forum>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, condition_id, rules, is_private, created_by, created_at
         FROM forums
         WHERE (?1 IS NULL OR condition_id = ?1)
         ORDER BY name, created_at",
    )?;
    let rows = stmt
        .query_map(params![condition_id.map(|id| id.to_string())], forum_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get_forum(conn: &Connection, id: &Uuid) -> Result<Option<Forum>, DatabaseError> {
    let forum = conn
        .query_row(
            "SELECT id, name, description, condition_id, rules, is_private, created_by, created_at
             FROM forums WHERE id = ?1",
            params![id.to_string()],
            forum_from_row,
        )
        .optional()?;
    Ok(forum)
}
