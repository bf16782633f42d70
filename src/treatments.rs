//! Treatment catalog and per-user treatment usage.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use crate::db;
use crate::error::{optional_text, require_id, require_scale, require_text, AccessError};
use crate::models::{Treatment, TreatmentUsage};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTreatment {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub treatment_type: Option<String>,
    pub description: Option<String>,
    pub side_effects: Option<String>,
    pub contraindications: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentUsageEntry {
    pub treatment_id: Option<String>,
    pub effectiveness: Option<i64>,
    pub notes: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

pub fn create_treatment(conn: &Connection, input: &NewTreatment) -> Result<Treatment, AccessError> {
    let name = require_text(input.name.as_deref(), "name")?;
    let treatment_type = require_text(input.treatment_type.as_deref(), "type")?;

    let treatment = Treatment {
        id: Uuid::new_v4(),
        name,
        treatment_type,
        description: optional_text(input.description.as_deref()),
        side_effects: optional_text(input.side_effects.as_deref()),
        contraindications: optional_text(input.contraindications.as_deref()),
        created_at: db::timestamp_now(),
    };
    db::insert_treatment(conn, &treatment)?;

    tracing::info!(treatment_id = %treatment.id, kind = %treatment.treatment_type, "Treatment created");
    Ok(treatment)
}

pub fn get_treatments(
    conn: &Connection,
    treatment_type: Option<&str>,
) -> Result<Vec<Treatment>, AccessError> {
    let treatment_type = optional_text(treatment_type);
    Ok(db::list_treatments(conn, treatment_type.as_deref())?)
}

/// Records that `user_id` used a treatment, optionally rating it 1-10.
pub fn record_treatment_usage(
    conn: &Connection,
    user_id: &Uuid,
    entry: &TreatmentUsageEntry,
) -> Result<TreatmentUsage, AccessError> {
    let treatment_id = require_id(entry.treatment_id.as_deref(), "treatmentId")?;
    let effectiveness = entry
        .effectiveness
        .map(|value| require_scale(value, "effectiveness"))
        .transpose()?;

    let now = db::timestamp_now();
    let started_at = entry.started_at.map(db::stored_precision).unwrap_or(now);
    let ended_at = entry.ended_at.map(db::stored_precision);
    if matches!(ended_at, Some(ended) if ended < started_at) {
        return Err(AccessError::validation("endedAt cannot be before startedAt"));
    }

    let treatment = db::get_treatment(conn, &treatment_id)?
        .ok_or_else(|| AccessError::validation("treatmentId does not match a known treatment"))?;

    let usage = TreatmentUsage {
        id: Uuid::new_v4(),
        user_id: *user_id,
        treatment_id,
        treatment_name: treatment.name,
        effectiveness,
        notes: optional_text(entry.notes.as_deref()),
        started_at,
        ended_at,
        created_at: now,
    };
    db::insert_treatment_usage(conn, &usage)?;

    tracing::info!(usage_id = %usage.id, treatment_id = %usage.treatment_id, "Treatment usage recorded");
    Ok(usage)
}

pub fn get_treatment_usage(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<Vec<TreatmentUsage>, AccessError> {
    Ok(db::list_treatment_usage(conn, user_id)?)
}
