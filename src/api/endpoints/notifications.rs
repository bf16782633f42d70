//! Notification endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::endpoints::messages::UnreadQuery;
use crate::api::error::ApiError;
use crate::api::types::{require_caller, ApiContext, ApiQuery, MaybeCaller};
use crate::authorization::Operation;
use crate::messaging;
use crate::models::Notification;

/// `GET /notifications?unread=`
pub async fn list(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
    ApiQuery(query): ApiQuery<UnreadQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let caller = require_caller(caller, Operation::ReadOwnData)?;
    let conn = ctx.open_db()?;
    let unread_only = query.unread.unwrap_or(false);
    Ok(Json(messaging::get_notifications(&conn, &caller.user_id, unread_only)?))
}

/// `PUT /notifications/read-all`: 204 whether or not anything changed.
pub async fn read_all(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
) -> Result<StatusCode, ApiError> {
    let caller = require_caller(caller, Operation::MarkRead)?;
    let conn = ctx.open_db()?;
    messaging::mark_all_notifications_as_read(&conn, &caller.user_id)?;
    Ok(StatusCode::NO_CONTENT)
}
