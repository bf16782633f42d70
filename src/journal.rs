//! Symptom journal: the symptom catalog and per-user symptom logs.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use crate::db;
use crate::error::{optional_text, require_id, require_scale, require_text, AccessError};
use crate::models::{Symptom, SymptomLog};

pub const DEFAULT_SEVERITY_SCALE: &str = "1-10";
pub const DEFAULT_LOG_LIMIT: u32 = 50;
pub const MAX_LOG_LIMIT: u32 = 500;

/// Payload for a new catalog symptom.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSymptom {
    pub name: Option<String>,
    pub description: Option<String>,
    pub severity_scale: Option<String>,
    pub measurement_unit: Option<String>,
}

/// Payload for logging one symptom occurrence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomLogEntry {
    pub symptom_id: Option<String>,
    pub severity: Option<i64>,
    pub notes: Option<String>,
    pub triggers: Option<Vec<String>>,
    pub duration_minutes: Option<i64>,
    pub logged_at: Option<DateTime<Utc>>,
}

pub fn create_symptom(conn: &Connection, input: &NewSymptom) -> Result<Symptom, AccessError> {
    let name = require_text(input.name.as_deref(), "name")?;

    let symptom = Symptom {
        id: Uuid::new_v4(),
        name,
        description: optional_text(input.description.as_deref()),
        severity_scale: optional_text(input.severity_scale.as_deref())
            .unwrap_or_else(|| DEFAULT_SEVERITY_SCALE.to_string()),
        measurement_unit: optional_text(input.measurement_unit.as_deref()),
        created_at: db::timestamp_now(),
    };
    db::insert_symptom(conn, &symptom)?;

    tracing::info!(symptom_id = %symptom.id, "Symptom created");
    Ok(symptom)
}

pub fn get_symptoms(conn: &Connection) -> Result<Vec<Symptom>, AccessError> {
    Ok(db::list_symptoms(conn)?)
}

/// Records a symptom occurrence for `user_id`.
///
/// Severity must be on the 1-10 scale. Triggers keep their order; blank
/// entries are dropped. A missing `logged_at` is stamped with the current time.
pub fn log_symptom(
    conn: &Connection,
    user_id: &Uuid,
    entry: &SymptomLogEntry,
) -> Result<SymptomLog, AccessError> {
    let symptom_id = require_id(entry.symptom_id.as_deref(), "symptomId")?;
    let severity = entry
        .severity
        .ok_or_else(|| AccessError::validation("severity is required"))?;
    let severity = require_scale(severity, "severity")?;
    if matches!(entry.duration_minutes, Some(minutes) if minutes < 0) {
        return Err(AccessError::validation("durationMinutes cannot be negative"));
    }

    let symptom = db::get_symptom(conn, &symptom_id)?
        .ok_or_else(|| AccessError::validation("symptomId does not match a known symptom"))?;

    let now = db::timestamp_now();
    let log = SymptomLog {
        id: Uuid::new_v4(),
        user_id: *user_id,
        symptom_id,
        symptom_name: symptom.name,
        severity,
        notes: optional_text(entry.notes.as_deref()),
        triggers: normalize_triggers(entry.triggers.as_deref().unwrap_or_default()),
        duration_minutes: entry.duration_minutes,
        logged_at: entry.logged_at.map(db::stored_precision).unwrap_or(now),
        created_at: now,
    };
    db::insert_symptom_log(conn, &log)?;

    tracing::info!(log_id = %log.id, symptom_id = %log.symptom_id, severity, "Symptom logged");
    Ok(log)
}

/// Most recent logs of the caller, newest first, with triggers decoded.
pub fn get_symptom_logs(
    conn: &Connection,
    user_id: &Uuid,
    limit: Option<u32>,
) -> Result<Vec<SymptomLog>, AccessError> {
    let limit = limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT);
    Ok(db::list_symptom_logs(conn, user_id, limit)?)
}

fn normalize_triggers(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}
