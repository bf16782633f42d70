use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// A condition tracked by one user, with the condition name joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCondition {
    pub id: Uuid,
    pub user_id: Uuid,
    pub condition_id: Uuid,
    pub condition_name: String,
    pub diagnosed_date: Option<NaiveDate>,
    pub severity: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
