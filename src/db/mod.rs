pub mod repository;
pub mod sqlite;

pub use repository::*;
pub use sqlite::*;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Stored value could not be decoded: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Formats a timestamp the way every table stores it.
///
/// Fixed width (millisecond precision, `Z` suffix) so that lexical
/// comparison in SQL matches chronological order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Drops precision below what [`format_timestamp`] keeps, so a record
/// built in memory equals the one read back.
pub fn stored_precision(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(3)
}

/// Current time at storage precision.
pub fn timestamp_now() -> DateTime<Utc> {
    stored_precision(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_format_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();
        let fractional = whole + chrono::Duration::milliseconds(500);
        assert_eq!(format_timestamp(&whole), "2025-01-15T10:00:00.000Z");
        assert_eq!(format_timestamp(&fractional), "2025-01-15T10:00:00.500Z");
        assert!(format_timestamp(&whole) < format_timestamp(&fractional));
    }

    #[test]
    fn stored_precision_matches_formatted_value() {
        let precise = DateTime::parse_from_rfc3339("2025-03-10T12:00:00.123456Z")
            .unwrap()
            .with_timezone(&Utc);
        let stored = stored_precision(precise);
        assert_eq!(format_timestamp(&stored), "2025-03-10T12:00:00.123Z");
        assert_eq!(
            DateTime::parse_from_rfc3339(&format_timestamp(&stored)).unwrap(),
            stored
        );

        let now = timestamp_now();
        assert_eq!(stored_precision(now), now);
    }
}
