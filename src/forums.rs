//! Community forums (listing and creation only).

use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use crate::db;
use crate::error::{optional_text, require_text, AccessError};
use crate::models::Forum;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewForum {
    pub name: Option<String>,
    pub description: Option<String>,
    pub condition_id: Option<String>,
    pub rules: Option<String>,
    pub is_private: Option<bool>,
}

/// Creates a forum. Role checks happen at the HTTP boundary; `creator_id`
/// is the resolved caller.
pub fn create_forum(
    conn: &Connection,
    creator_id: &Uuid,
    input: &NewForum,
) -> Result<Forum, AccessError> {
    let name = require_text(input.name.as_deref(), "name")?;

    let condition_id = match optional_text(input.condition_id.as_deref()) {
        Some(raw) => {
            let id = Uuid::parse_str(&raw)
                .map_err(|_| AccessError::validation("conditionId is not a valid id"))?;
            if db::get_condition(conn, &id)?.is_none() {
                return Err(AccessError::validation(
                    "conditionId does not match a known condition",
                ));
            }
            Some(id)
        }
        None => None,
    };

    let forum = Forum {
        id: Uuid::new_v4(),
        name,
        description: optional_text(input.description.as_deref()),
        condition_id,
        rules: optional_text(input.rules.as_deref()),
        is_private: input.is_private.unwrap_or(false),
        created_by: *creator_id,
        created_at: db::timestamp_now(),
    };
    db::insert_forum(conn, &forum)?;

    tracing::info!(forum_id = %forum.id, "Forum created");
    Ok(forum)
}

pub fn get_forums(conn: &Connection, condition_id: Option<&Uuid>) -> Result<Vec<Forum>, AccessError> {
    Ok(db::list_forums(conn, condition_id)?)
}

pub fn get_forum(conn: &Connection, id: &Uuid) -> Result<Forum, AccessError> {
    db::get_forum(conn, id)?.ok_or_else(|| AccessError::NotFound {
        entity: "Forum",
        id: id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{create_condition, NewCondition};
    use crate::error::ErrorKind;
    use crate::models::enums::Role;
    use crate::test_support::{seed_user, test_db};

    #[test]
    fn create_forum_requires_name() {
        let conn = test_db();
        let admin = seed_user(&conn, Role::Admin);
        let err = create_forum(&conn, &admin, &NewForum::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn create_forum_links_known_condition() {
        let conn = test_db();
        let doctor = seed_user(&conn, Role::Doctor);
        let asthma = create_condition(&conn, &NewCondition {
            name: Some("Asthma".into()),
            description: None,
            category: Some("Respiratory".into()),
        })
        .unwrap();

        let forum = create_forum(&conn, &doctor, &NewForum {
            name: Some("Breathing easy".into()),
            condition_id: Some(asthma.id.to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(forum.condition_id, Some(asthma.id));
        assert_eq!(forum.created_by, doctor);
        assert!(!forum.is_private);

        assert_eq!(get_forums(&conn, Some(&asthma.id)).unwrap().len(), 1);
        assert_eq!(get_forum(&conn, &forum.id).unwrap().name, "Breathing easy");
    }

    #[test]
    fn create_forum_rejects_unknown_condition() {
        let conn = test_db();
        let admin = seed_user(&conn, Role::Admin);
        for raw in ["garbage".to_string(), Uuid::new_v4().to_string()] {
            let err = create_forum(&conn, &admin, &NewForum {
                name: Some("Orphan".into()),
                condition_id: Some(raw),
                ..Default::default()
            })
            .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn get_missing_forum_is_not_found() {
        let conn = test_db();
        let err = get_forum(&conn, &Uuid::new_v4()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
