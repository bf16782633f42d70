//! Shared fixtures for unit tests.

use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db;
use crate::models::enums::Role;
use crate::models::User;

pub fn test_db() -> Connection {
    db::open_memory_database().expect("in-memory DB")
}

pub fn seed_user(conn: &Connection, role: Role) -> Uuid {
    let id = Uuid::new_v4();
    db::insert_user(conn, &User {
        id,
        display_name: format!("{} {}", role.as_str().to_lowercase(), &id.to_string()[..8]),
        role,
        created_at: Utc::now(),
    })
    .expect("seed user");
    id
}
