use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{optional_timestamp_column, timestamp_column, uuid_column};
use crate::db::{format_timestamp, DatabaseError};
use crate::models::{Treatment, TreatmentUsage};

pub fn insert_treatment(conn: &Connection, treatment: &Treatment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO treatments (id, name, type, description, side_effects, contraindications,
         created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            treatment.id.to_string(),
            treatment.name,
            treatment.treatment_type,
            treatment.description,
            treatment.side_effects,
            treatment.contraindications,
            format_timestamp(&treatment.created_at),
        ],
    )?;
    Ok(())
}

fn treatment_from_row(row: &Row<'_>) -> rusqlite::Result<Treatment> {
    Ok(Treatment {
        id: uuid_column(row, 0)?,
        name: row.get(1)?,
        treatment_type: row.get(2)?,
        description: row.get(3)?,
        side_effects: row.get(4)?,
        contraindications: row.get(5)?,
        created_at: timestamp_column(row, 6)?,
    })
}

pub fn list_treatments(
    conn: &Connection,
    treatment_type: Option<&str>,
) -> Result<Vec<Treatment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type, description, side_effects, contraindications, created_at
         FROM treatments
         WHERE (?1 IS NULL OR type = ?1)
         ORDER BY name, created_at",
    )?;
    let rows = stmt
        .query_map(params![treatment_type], treatment_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get_treatment(conn: &Connection, id: &Uuid) -> Result<Option<Treatment>, DatabaseError> {
    let treatment = conn
        .query_row(
            "SELECT id, name, type, description, side_effects, contraindications, created_at
             FROM treatments WHERE id = ?1",
            params![id.to_string()],
            treatment_from_row,
        )
        .optional()?;
    Ok(treatment)
}

/// Inserts a usage record. `treatment_name` is read-only and ignored.
pub fn insert_treatment_usage(
    conn: &Connection,
    usage: &TreatmentUsage,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO treatment_usage (id, user_id, treatment_id, effectiveness, notes,
         started_at, ended_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            usage.id.to_string(),
            usage.user_id.to_string(),
            usage.treatment_id.to_string(),
            usage.effectiveness,
            usage.notes,
            format_timestamp(&usage.started_at),
            usage.ended_at.as_ref().map(format_timestamp),
            format_timestamp(&usage.created_at),
        ],
    )?;
    Ok(())
}

pub fn list_treatment_usage(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<Vec<TreatmentUsage>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.user_id, u.treatment_id, t.name, u.effectiveness, u.notes,
                u.started_at, u.ended_at, u.created_at
         FROM treatment_usage u
         JOIN treatments t ON u.treatment_id = t.id
         WHERE u.user_id = ?1
         ORDER BY u.started_at DESC, u.created_at DESC",
    )?;
    let rows = stmt
        .query_map(params![user_id.to_string()], |row| {
            Ok(TreatmentUsage {
                id: uuid_column(row, 0)?,
                user_id: uuid_column(row, 1)?,
                treatment_id: uuid_column(row, 2)?,
                treatment_name: row.get(3)?,
                effectiveness: row.get(4)?,
                notes: row.get(5)?,
                started_at: timestamp_column(row, 6)?,
                ended_at: optional_timestamp_column(row, 7)?,
                created_at: timestamp_column(row, 8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
