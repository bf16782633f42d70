//! Shared types for the HTTP layer.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequestParts;
use axum::{Extension, Json};
use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::authorization::{self, Operation};
use crate::db;
use crate::identity::CallerContext;

// ═══════════════════════════════════════════════════════════
// API context
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes and middleware. Immutable; each request
/// opens its own connection.
#[derive(Clone)]
pub struct ApiContext {
    pub db_path: Arc<PathBuf>,
}

impl ApiContext {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
        }
    }

    /// Open a connection for the current request.
    pub fn open_db(&self) -> Result<Connection, ApiError> {
        Ok(db::connect(&self.db_path)?)
    }
}

// ═══════════════════════════════════════════════════════════
// Extractors
// ═══════════════════════════════════════════════════════════

/// JSON body held back until the caller has passed the role gate.
/// Unwrap it with [`json_body`].
pub type JsonBody<T> = Result<Json<T>, JsonRejection>;

/// Query string whose rejection renders as a 400 `ErrorBody`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Path parameters whose rejection renders as a 400 `ErrorBody`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Caller as injected by the identity middleware, absent for anonymous
/// requests.
pub type MaybeCaller = Option<Extension<CallerContext>>;

/// Require an authenticated caller allowed to perform `operation`.
pub fn require_caller(
    caller: MaybeCaller,
    operation: Operation,
) -> Result<CallerContext, ApiError> {
    let Extension(caller) = caller.ok_or(ApiError::Unauthorized)?;
    authorization::check(caller.role, operation).map_err(ApiError::Forbidden)?;
    Ok(caller)
}

/// Body of a request whose caller is already authorized; a malformed
/// body becomes a 400 `ErrorBody`.
pub fn json_body<T>(body: JsonBody<T>) -> Result<T, ApiError> {
    let Json(value) = body?;
    Ok(value)
}
