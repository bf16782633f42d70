//! Direct messages and notifications.
//!
//! Read-state transitions are only permitted for the recipient/owner. The
//! check happens here rather than in storage.

use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use crate::db;
use crate::error::{optional_text, require_id, require_text, AccessError};
use crate::models::enums::NotificationKind;
use crate::models::{Message, Notification};

const PREVIEW_CHARS: usize = 80;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub recipient_id: Option<String>,
    pub subject: Option<String>,
    pub content: Option<String>,
}

/// Sends a message from `sender_id` and notifies the recipient.
///
/// Message and notification are written in one transaction.
pub fn send_message(
    conn: &Connection,
    sender_id: &Uuid,
    input: &NewMessage,
) -> Result<Message, AccessError> {
    let recipient_id = require_id(input.recipient_id.as_deref(), "recipientId")?;
    let content = require_text(input.content.as_deref(), "content")?;
    if !db::user_exists(conn, &recipient_id)? {
        return Err(AccessError::validation("recipientId does not match a known user"));
    }

    let now = db::timestamp_now();
    let message = Message {
        id: Uuid::new_v4(),
        sender_id: *sender_id,
        recipient_id,
        subject: optional_text(input.subject.as_deref()),
        content,
        created_at: now,
        read_at: None,
    };
    let notification = Notification {
        id: Uuid::new_v4(),
        user_id: recipient_id,
        kind: NotificationKind::NewMessage,
        title: message
            .subject
            .clone()
            .unwrap_or_else(|| "New message".to_string()),
        body: Some(preview(&message.content)),
        created_at: now,
        read_at: None,
    };

    let tx = conn.unchecked_transaction()?;
    db::insert_message(&tx, &message)?;
    db::insert_notification(&tx, &notification)?;
    tx.commit()?;

    tracing::info!(message_id = %message.id, "Message sent");
    Ok(message)
}

/// The caller's inbox, newest first.
pub fn get_messages(
    conn: &Connection,
    user_id: &Uuid,
    unread_only: bool,
) -> Result<Vec<Message>, AccessError> {
    Ok(db::list_messages_for_recipient(conn, user_id, unread_only)?)
}

/// Marks a message as read on behalf of its recipient.
///
/// A message addressed to someone else yields the same `NotFound` as an
/// unknown id.
pub fn mark_message_as_read(
    conn: &Connection,
    message_id: &Uuid,
    user_id: &Uuid,
) -> Result<Message, AccessError> {
    let not_found = || AccessError::NotFound {
        entity: "Message",
        id: message_id.to_string(),
    };

    let message = db::get_message(conn, message_id)?.ok_or_else(not_found)?;
    if message.recipient_id != *user_id {
        tracing::debug!(message_id = %message_id, "Read attempt by non-recipient");
        return Err(not_found());
    }

    db::mark_message_read(conn, message_id, &db::timestamp_now())?;
    db::get_message(conn, message_id)?.ok_or_else(not_found)
}

pub fn get_notifications(
    conn: &Connection,
    user_id: &Uuid,
    unread_only: bool,
) -> Result<Vec<Notification>, AccessError> {
    Ok(db::list_notifications(conn, user_id, unread_only)?)
}

/// Marks all of the caller's notifications read. Returns the number changed.
pub fn mark_all_notifications_as_read(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<usize, AccessError> {
    let updated = db::mark_all_notifications_read(conn, user_id, &db::timestamp_now())?;
    tracing::info!(updated, "Notifications marked read");
    Ok(updated)
}

fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::enums::Role;
    use crate::test_support::{seed_user, test_db};

    fn send(conn: &Connection, from: &Uuid, to: &Uuid) -> Message {
        send_message(conn, from, &NewMessage {
            recipient_id: Some(to.to_string()),
            subject: None,
            content: Some("How are you feeling today?".into()),
        })
        .unwrap()
    }

    #[test]
    fn send_message_validates_fields() {
        let conn = test_db();
        let alice = seed_user(&conn, Role::Patient);
        let bob = seed_user(&conn, Role::Patient);

        let no_content = NewMessage {
            recipient_id: Some(bob.to_string()),
            ..Default::default()
        };
        let unknown_recipient = NewMessage {
            recipient_id: Some(Uuid::new_v4().to_string()),
            content: Some("hi".into()),
            ..Default::default()
        };
        for input in [NewMessage::default(), no_content, unknown_recipient] {
            let err = send_message(&conn, &alice, &input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn send_message_notifies_recipient() {
        let conn = test_db();
        let alice = seed_user(&conn, Role::Patient);
        let bob = seed_user(&conn, Role::Doctor);
        send(&conn, &alice, &bob);

        let inbox = get_messages(&conn, &bob, true).unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].sender_id, alice);

        let notifications = get_notifications(&conn, &bob, true).unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::NewMessage);
        assert!(get_notifications(&conn, &alice, false).unwrap().is_empty());
    }

    #[test]
    fn sent_message_matches_inbox_copy() {
        let conn = test_db();
        let alice = seed_user(&conn, Role::Patient);
        let bob = seed_user(&conn, Role::Patient);
        let sent = send(&conn, &alice, &bob);

        let inbox = get_messages(&conn, &bob, false).unwrap();
        assert_eq!(inbox, vec![sent.clone()]);
        assert_eq!(get_notifications(&conn, &bob, false).unwrap()[0].created_at, sent.created_at);

        let read = mark_message_as_read(&conn, &sent.id, &bob).unwrap();
        assert_eq!(get_messages(&conn, &bob, false).unwrap(), vec![read]);
    }

    #[test]
    fn recipient_can_mark_read() {
        let conn = test_db();
        let alice = seed_user(&conn, Role::Patient);
        let bob = seed_user(&conn, Role::Patient);
        let message = send(&conn, &alice, &bob);

        let updated = mark_message_as_read(&conn, &message.id, &bob).unwrap();
        assert!(updated.read_at.is_some());
        assert!(get_messages(&conn, &bob, true).unwrap().is_empty());
    }

    #[test]
    fn non_recipient_gets_same_error_as_missing_message() {
        let conn = test_db();
        let alice = seed_user(&conn, Role::Patient);
        let bob = seed_user(&conn, Role::Patient);
        let mallory = seed_user(&conn, Role::Patient);
        let message = send(&conn, &alice, &bob);

        let foreign = mark_message_as_read(&conn, &message.id, &mallory).unwrap_err();
        let sender = mark_message_as_read(&conn, &message.id, &alice).unwrap_err();
        let missing_id = Uuid::new_v4();
        let missing = mark_message_as_read(&conn, &missing_id, &mallory).unwrap_err();

        for err in [&foreign, &sender, &missing] {
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
        assert_eq!(
            foreign.to_string(),
            missing.to_string().replace(&missing_id.to_string(), &message.id.to_string())
        );

        // Nothing changed for the real recipient
        assert_eq!(get_messages(&conn, &bob, true).unwrap().len(), 1);
    }

    #[test]
    fn bulk_read_only_touches_owner() {
        let conn = test_db();
        let alice = seed_user(&conn, Role::Patient);
        let bob = seed_user(&conn, Role::Patient);
        send(&conn, &alice, &bob);
        send(&conn, &alice, &bob);
        send(&conn, &bob, &alice);

        assert_eq!(mark_all_notifications_as_read(&conn, &bob).unwrap(), 2);
        assert_eq!(mark_all_notifications_as_read(&conn, &bob).unwrap(), 0);
        assert_eq!(get_notifications(&conn, &alice, true).unwrap().len(), 1);
    }

    #[test]
    fn preview_truncates_long_content() {
        let long = "a".repeat(PREVIEW_CHARS + 5);
        let shown = preview(&long);
        assert!(shown.ends_with('…'));
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 1);
        assert_eq!(preview("short"), "short");
    }
}
