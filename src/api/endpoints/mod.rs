//! Endpoint handlers, one module per resource.
//!
//! Handlers resolve the caller, apply the role gate, then delegate to the
//! domain modules. No business rules live here.

pub mod conditions;
pub mod forums;
pub mod health;
pub mod journal;
pub mod messages;
pub mod notifications;
pub mod stats;
pub mod treatments;
