//! Role gate for write operations.
//!
//! Evaluated once per request at the HTTP boundary, after the caller is
//! resolved. Default-allow applies only to operations any signed-in user
//! may perform; catalog writes are restricted.

use crate::models::enums::Role;

// ═══════════════════════════════════════════════════════════
// Operations
// ═══════════════════════════════════════════════════════════

/// Operations that require an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateCondition,
    CreateSymptom,
    CreateTreatment,
    CreateForum,
    AddUserCondition,
    LogSymptom,
    RecordTreatmentUsage,
    SendMessage,
    MarkRead,
    ReadOwnData,
}

impl Operation {
    /// Body returned with a 403 when the gate refuses this operation.
    pub fn forbidden_message(self) -> &'static str {
        match self {
            Self::CreateForum => "Forbidden - Admin or doctor only",
            _ => "Forbidden - Admin only",
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Gate
// ═══════════════════════════════════════════════════════════

pub fn can_perform(role: Role, operation: Operation) -> bool {
    use Operation::*;
    match operation {
        CreateCondition | CreateSymptom | CreateTreatment => role == Role::Admin,
        CreateForum => matches!(role, Role::Admin | Role::Doctor),
        AddUserCondition | LogSymptom | RecordTreatmentUsage | SendMessage | MarkRead
        | ReadOwnData => true,
    }
}

/// Returns the 403 message when `role` may not perform `operation`.
pub fn check(role: Role, operation: Operation) -> Result<(), &'static str> {
    if can_perform(role, operation) {
        Ok(())
    } else {
        tracing::warn!(role = %role, ?operation, "Operation refused by role gate");
        Err(operation.forbidden_message())
    }
}
