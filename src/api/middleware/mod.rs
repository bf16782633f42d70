//! Request middleware.
//!
//! Execution order (outermost to innermost):
//! 1. Identity: resolves the bearer token, never rejects
//! 2. Audit logger: runs after identity, so it has the caller id

pub mod audit;
pub mod identity;
