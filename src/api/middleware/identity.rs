//! Bearer token identity middleware.
//!
//! Extracts `Authorization: Bearer <token>`, resolves it against the
//! session table, and injects `CallerContext` into request extensions.
//! Anonymous requests pass through; handlers decide whether a caller is
//! required.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::identity;

pub async fn resolve_identity(req: Request<axum::body::Body>, next: Next) -> Response {
    match resolve_identity_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn resolve_identity_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    if let Some(token) = token {
        let ctx: ApiContext = req
            .extensions()
            .get::<ApiContext>()
            .cloned()
            .ok_or(ApiError::Internal("missing API context".into()))?;

        // Connection is dropped before the handler runs
        let caller = {
            let conn = ctx.open_db()?;
            identity::resolve_caller(&conn, &token)?
        };

        match caller {
            Some(caller) => {
                req.extensions_mut().insert(caller);
            }
            None => tracing::warn!("Bearer token did not match an active session"),
        }
    }

    Ok(next.run(req).await)
}
