//! Condition catalog and per-user condition tracking.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use crate::db;
use crate::error::{optional_text, require_id, require_text, AccessError};
use crate::models::{Condition, UserCondition};

/// Payload for a new catalog condition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCondition {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Payload for linking a condition to the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserCondition {
    pub condition_id: Option<String>,
    pub diagnosed_date: Option<NaiveDate>,
    pub severity: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

pub fn create_condition(conn: &Connection, input: &NewCondition) -> Result<Condition, AccessError> {
    let name = require_text(input.name.as_deref(), "name")?;
    let category = require_text(input.category.as_deref(), "category")?;

    let condition = Condition {
        id: Uuid::new_v4(),
        name,
        description: optional_text(input.description.as_deref()),
        category,
        created_at: db::timestamp_now(),
    };
    db::insert_condition(conn, &condition)?;

    tracing::info!(condition_id = %condition.id, category = %condition.category, "Condition created");
    Ok(condition)
}

/// All conditions, or those of one category, ordered by name.
pub fn get_conditions(
    conn: &Connection,
    category: Option<&str>,
) -> Result<Vec<Condition>, AccessError> {
    let category = optional_text(category);
    Ok(db::list_conditions(conn, category.as_deref())?)
}

/// Links a condition to `user_id`. Ownership always comes from the caller.
pub fn add_user_condition(
    conn: &Connection,
    user_id: &Uuid,
    input: &NewUserCondition,
) -> Result<UserCondition, AccessError> {
    let condition_id = require_id(input.condition_id.as_deref(), "conditionId")?;
    let condition = db::get_condition(conn, &condition_id)?
        .ok_or_else(|| AccessError::validation("conditionId does not match a known condition"))?;

    let entry = UserCondition {
        id: Uuid::new_v4(),
        user_id: *user_id,
        condition_id,
        condition_name: condition.name,
        diagnosed_date: input.diagnosed_date,
        severity: optional_text(input.severity.as_deref()),
        notes: optional_text(input.notes.as_deref()),
        is_active: input.is_active.unwrap_or(true),
        created_at: db::timestamp_now(),
    };
    db::insert_user_condition(conn, &entry)?;

    tracing::info!(user_condition_id = %entry.id, "User condition added");
    Ok(entry)
}

pub fn get_user_conditions(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<Vec<UserCondition>, AccessError> {
    Ok(db::list_user_conditions(conn, user_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::enums::Role;
    use crate::test_support::{seed_user, test_db};

    fn condition(name: Option<&str>, category: Option<&str>) -> NewCondition {
        NewCondition {
            name: name.map(Into::into),
            description: Some("desc".into()),
            category: category.map(Into::into),
        }
    }

    #[test]
    fn create_condition_requires_category() {
        let conn = test_db();
        for input in [
            condition(Some("Asthma"), None),
            condition(Some("Asthma"), Some("  ")),
            condition(None, None),
        ] {
            let err = create_condition(&conn, &input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert!(get_conditions(&conn, None).unwrap().is_empty());
    }

    #[test]
    fn create_condition_requires_name() {
        let conn = test_db();
        let err = create_condition(&conn, &condition(None, Some("Respiratory"))).unwrap_err();
        assert!(matches!(err, AccessError::Validation(ref m) if m.contains("name")));
    }

    #[test]
    fn create_then_filter_by_category() {
        let conn = test_db();
        let created = create_condition(&conn, &condition(Some(" Asthma "), Some("Respiratory"))).unwrap();
        create_condition(&conn, &condition(Some("Eczema"), Some("Skin"))).unwrap();

        assert_eq!(created.name, "Asthma");
        let respiratory = get_conditions(&conn, Some("Respiratory")).unwrap();
        assert_eq!(respiratory.len(), 1);
        assert_eq!(respiratory[0].id, created.id);

        // Blank filter means no filter
        assert_eq!(get_conditions(&conn, Some("")).unwrap().len(), 2);
    }

    #[test]
    fn add_user_condition_requires_condition_id() {
        let conn = test_db();
        let user = seed_user(&conn, Role::Patient);
        let err = add_user_condition(&conn, &user, &NewUserCondition::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn add_user_condition_rejects_unknown_condition() {
        let conn = test_db();
        let user = seed_user(&conn, Role::Patient);
        let input = NewUserCondition {
            condition_id: Some(Uuid::new_v4().to_string()),
            ..Default::default()
        };
        let err = add_user_condition(&conn, &user, &input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn add_user_condition_owned_by_caller() {
        let conn = test_db();
        let alice = seed_user(&conn, Role::Patient);
        let bob = seed_user(&conn, Role::Patient);
        let asthma = create_condition(&conn, &condition(Some("Asthma"), Some("Respiratory"))).unwrap();

        let input = NewUserCondition {
            condition_id: Some(asthma.id.to_string()),
            diagnosed_date: NaiveDate::from_ymd_opt(2019, 3, 2),
            severity: Some("mild".into()),
            notes: None,
            is_active: None,
        };
        let entry = add_user_condition(&conn, &alice, &input).unwrap();
        assert_eq!(entry.user_id, alice);
        assert!(entry.is_active);
        assert_eq!(entry.condition_name, "Asthma");

        assert_eq!(get_user_conditions(&conn, &alice).unwrap().len(), 1);
        assert!(get_user_conditions(&conn, &bob).unwrap().is_empty());
    }
}
