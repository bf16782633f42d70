//! HTTP router.
//!
//! Public reads and protected writes share paths, so every route sits
//! behind the same stack and handlers decide whether a caller is needed.
//!
//! Middleware stack (outermost to innermost):
//! Extension(ApiContext) → CORS → Cache-Control → Identity → Audit → Handler

use axum::http::header::{self, HeaderValue};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the API router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost layer).
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
pub fn api_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/conditions",
            get(endpoints::conditions::list).post(endpoints::conditions::create),
        )
        .route(
            "/conditions/user",
            get(endpoints::conditions::list_mine).post(endpoints::conditions::add_mine),
        )
        .route(
            "/forums",
            get(endpoints::forums::list).post(endpoints::forums::create),
        )
        .route("/forums/:id", get(endpoints::forums::detail))
        .route(
            "/messages",
            get(endpoints::messages::list).post(endpoints::messages::send),
        )
        .route("/messages/:id/read", put(endpoints::messages::mark_read))
        .route("/notifications", get(endpoints::notifications::list))
        .route(
            "/notifications/read-all",
            put(endpoints::notifications::read_all),
        )
        .route(
            "/symptoms",
            get(endpoints::journal::list).post(endpoints::journal::create),
        )
        .route("/symptoms/log", post(endpoints::journal::record))
        .route("/symptoms/logs", get(endpoints::journal::history))
        .route("/symptoms/stats", get(endpoints::stats::symptoms))
        .route(
            "/treatments",
            get(endpoints::treatments::list).post(endpoints::treatments::create),
        )
        .route(
            "/treatments/usage",
            get(endpoints::treatments::list_usage).post(endpoints::treatments::record_usage),
        )
        .route("/treatments/stats", get(endpoints::stats::treatments))
        .with_state(ctx.clone())
        // Middleware stack (innermost first, outermost last):
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(axum::middleware::from_fn(middleware::identity::resolve_identity))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive())
        // Extension must be outermost so middleware can extract ApiContext
        .layer(axum::Extension(ctx))
}
