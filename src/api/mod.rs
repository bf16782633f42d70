//! HTTP boundary.
//!
//! Resolves the caller from a bearer token, applies the role gate, parses
//! bodies and maps domain errors to status codes. `api_router()` returns a
//! `Router` that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_server, ApiServer};
pub use types::ApiContext;
