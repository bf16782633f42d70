use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{conversion_error, timestamp_column, uuid_column};
use crate::db::{format_timestamp, DatabaseError};
use crate::models::SymptomLog;

/// Inserts a symptom log. Triggers are stored as a JSON array so their
/// order survives; `symptom_name` is read-only and ignored.
pub fn insert_symptom_log(conn: &Connection, log: &SymptomLog) -> Result<(), DatabaseError> {
    let triggers = serde_json::to_string(&log.triggers)?;
    conn.execute(
        "INSERT INTO symptom_logs (id, user_id, symptom_id, severity, notes, triggers,
         duration_minutes, logged_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            log.id.to_string(),
            log.user_id.to_string(),
            log.symptom_id.to_string(),
            log.severity,
            log.notes,
            triggers,
            log.duration_minutes,
            format_timestamp(&log.logged_at),
            format_timestamp(&log.created_at),
        ],
    )?;
    Ok(())
}

/// Most recent logs of one user, newest `logged_at` first.
pub fn list_symptom_logs(
    conn: &Connection,
    user_id: &Uuid,
    limit: u32,
) -> Result<Vec<SymptomLog>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT l.id, l.user_id, l.symptom_id, s.name, l.severity, l.notes, l.triggers,
                l.duration_minutes, l.logged_at, l.created_at
         FROM symptom_logs l
         JOIN symptoms s ON l.symptom_id = s.id
         WHERE l.user_id = ?1
         ORDER BY l.logged_at DESC, l.created_at DESC
         LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(params![user_id.to_string(), limit], |row| {
            let raw_triggers: String = row.get(6)?;
            let triggers: Vec<String> =
                serde_json::from_str(&raw_triggers).map_err(|e| conversion_error(6, e))?;
            Ok(SymptomLog {
                id: uuid_column(row, 0)?,
                user_id: uuid_column(row, 1)?,
                symptom_id: uuid_column(row, 2)?,
                symptom_name: row.get(3)?,
                severity: row.get(4)?,
                notes: row.get(5)?,
                triggers,
                duration_minutes: row.get(7)?,
                logged_at: timestamp_column(row, 8)?,
                created_at: timestamp_column(row, 9)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
