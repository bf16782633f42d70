//! Errors raised by the domain access layer.
//!
//! Callers switch on [`AccessError::kind`] (or the variant itself), never on
//! the rendered message.

use crate::db::DatabaseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
}

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Also used when the record exists but belongs to someone else,
    /// so callers cannot probe for records they may not see.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

impl AccessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<rusqlite::Error> for AccessError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(DatabaseError::Sqlite(err))
    }
}

/// Returns the trimmed value of a required text field.
/// Missing and whitespace-only values are both treated as absent.
pub(crate) fn require_text(value: Option<&str>, field: &str) -> Result<String, AccessError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AccessError::validation(format!("{field} is required")))
}

/// Trims an optional text field, folding blank values to `None`.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Parses a required identifier field.
pub(crate) fn require_id(value: Option<&str>, field: &str) -> Result<uuid::Uuid, AccessError> {
    let raw = require_text(value, field)?;
    uuid::Uuid::parse_str(&raw)
        .map_err(|_| AccessError::validation(format!("{field} is not a valid id")))
}

/// Checks an integer rating against the shared 1-10 scale.
pub(crate) fn require_scale(value: i64, field: &str) -> Result<i32, AccessError> {
    if (1..=10).contains(&value) {
        Ok(value as i32)
    } else {
        Err(AccessError::validation(format!(
            "{field} must be between 1 and 10"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(require_text(Some("  Asthma "), "name").unwrap(), "Asthma");
        assert!(require_text(Some("   "), "name").is_err());
        let err = require_text(None, "category").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("category is required"));
    }

    #[test]
    fn optional_text_folds_blank_to_none() {
        assert_eq!(optional_text(Some(" ")), None);
        assert_eq!(optional_text(Some(" notes ")).as_deref(), Some("notes"));
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn require_id_rejects_malformed() {
        assert!(require_id(Some("not-a-uuid"), "symptomId").is_err());
        let id = uuid::Uuid::new_v4();
        assert_eq!(require_id(Some(&id.to_string()), "symptomId").unwrap(), id);
    }

    #[test]
    fn scale_bounds_are_inclusive() {
        assert_eq!(require_scale(1, "severity").unwrap(), 1);
        assert_eq!(require_scale(10, "severity").unwrap(), 10);
        assert!(require_scale(0, "severity").is_err());
        assert!(require_scale(11, "severity").is_err());
    }

    #[test]
    fn storage_kind_from_database_error() {
        let err: AccessError = DatabaseError::ConstraintViolation("x".into()).into();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }
}
