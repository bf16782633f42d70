use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{timestamp_column, uuid_column};
use crate::db::{format_timestamp, DatabaseError};
use crate::models::{Condition, UserCondition};

pub fn insert_condition(conn: &Connection, condition: &Condition) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO conditions (id, name, description, category, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            condition.id.to_string(),
            condition.name,
            condition.description,
            condition.category,
            format_timestamp(&condition.created_at),
        ],
    )?;
    Ok(())
}

fn condition_from_row(row: &Row<'_>) -> rusqlite::Result<Condition> {
    Ok(Condition {
        id: uuid_column(row, 0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        created_at: timestamp_column(row, 4)?,
    })
}

/// Lists conditions, optionally restricted to one category, by name.
pub fn list_conditions(
    conn: &Connection,
    category: Option<&str>,
) -> Result<Vec<Condition>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, category, created_at
         FROM conditions
         WHERE (?1 IS NULL OR category = ?1)
         ORDER BY name, created_at",
    )?;
    let rows = stmt
        .query_map(params![category], condition_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get_condition(conn: &Connection, id: &Uuid) -> Result<Option<Condition>, DatabaseError> {
    let condition = conn
        .query_row(
            "SELECT id, name, description, category, created_at FROM conditions WHERE id = ?1",
            params![id.to_string()],
            condition_from_row,
        )
        .optional()?;
    Ok(condition)
}

/// Inserts a user-condition link. `condition_name` is read-only and ignored.
pub fn insert_user_condition(
    conn: &Connection,
    entry: &UserCondition,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO user_conditions (id, user_id, condition_id, diagnosed_date, severity,
         notes, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            entry.id.to_string(),
            entry.user_id.to_string(),
            entry.condition_id.to_string(),
            entry.diagnosed_date.map(|d| d.to_string()),
            entry.severity,
            entry.notes,
            entry.is_active as i32,
            format_timestamp(&entry.created_at),
        ],
    )?;
    Ok(())
}

pub fn list_user_conditions(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<Vec<UserCondition>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT uc.id, uc.user_id, uc.condition_id, c.name, uc.diagnosed_date,
                uc.severity, uc.notes, uc.is_active, uc.created_at
         FROM user_conditions uc
         JOIN conditions c ON uc.condition_id = c.id
         WHERE uc.user_id = ?1
         ORDER BY uc.created_at DESC",
    )?;
    let rows = stmt
        .query_map(params![user_id.to_string()], |row| {
            let diagnosed: Option<String> = row.get(4)?;
            let is_active: i32 = row.get(7)?;
            Ok(UserCondition {
                id: uuid_column(row, 0)?,
                user_id: uuid_column(row, 1)?,
                condition_id: uuid_column(row, 2)?,
                condition_name: row.get(3)?,
                diagnosed_date: diagnosed
                    .and_then(|d| chrono::NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
                severity: row.get(5)?,
                notes: row.get(6)?,
                is_active: is_active != 0,
                created_at: timestamp_column(row, 8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
