use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forum {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub condition_id: Option<Uuid>,
    pub rules: Option<String>,
    pub is_private: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}
