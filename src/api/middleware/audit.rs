//! Audit logging middleware.
//!
//! Logs every request with method, path, response status and caller id.
//! Runs innermost (after identity has injected `CallerContext`).

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::identity::CallerContext;

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let caller = req
        .extensions()
        .get::<CallerContext>()
        .map(|c| c.user_id.to_string())
        .unwrap_or_else(|| "anonymous".to_string());

    let response = next.run(req).await;

    tracing::info!(
        target: "carecircle_lib::audit",
        %method,
        %path,
        status = response.status().as_u16(),
        caller = %caller,
        "API access"
    );

    response
}
