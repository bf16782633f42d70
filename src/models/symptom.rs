use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symptom {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub severity_scale: String,
    pub measurement_unit: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub symptom_id: Uuid,
    pub symptom_name: String,
    pub severity: i32,
    pub notes: Option<String>,
    pub triggers: Vec<String>,
    pub duration_minutes: Option<i64>,
    pub logged_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
