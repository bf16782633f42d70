use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{timestamp_column, uuid_column};
use crate::db::{format_timestamp, DatabaseError};
use crate::models::Symptom;

pub fn insert_symptom(conn: &Connection, symptom: &Symptom) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO symptoms (id, name, description, severity_scale, measurement_unit, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            symptom.id.to_string(),
            symptom.name,
            symptom.description,
            symptom.severity_scale,
            symptom.measurement_unit,
            format_timestamp(&symptom.created_at),
        ],
    )?;
    Ok(())
}

fn symptom_from_row(row: &Row<'_>) -> rusqlite::Result<Symptom> {
    Ok(Symptom {
        id: uuid_column(row, 0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        severity_scale: row.get(3)?,
        measurement_unit: row.get(4)?,
        created_at: timestamp_column(row, 5)?,
    })
}

pub fn list_symptoms(conn: &Connection) -> Result<Vec<Symptom>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, severity_scale, measurement_unit, created_at
         FROM symptoms ORDER BY name, created_at",
    )?;
    let rows = stmt
        .query_map([], symptom_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get_symptom(conn: &Connection, id: &Uuid) -> Result<Option<Symptom>, DatabaseError> {
    let symptom = conn
        .query_row(
            "SELECT id, name, description, severity_scale, measurement_unit, created_at
             FROM symptoms WHERE id = ?1",
            params![id.to_string()],
            symptom_from_row,
        )
        .optional()?;
    Ok(symptom)
}
