use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub treatment_type: String,
    pub description: Option<String>,
    pub side_effects: Option<String>,
    pub contraindications: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One period of a user taking a treatment, optionally rated 1-10.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentUsage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub treatment_id: Uuid,
    pub treatment_name: String,
    pub effectiveness: Option<i32>,
    pub notes: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
