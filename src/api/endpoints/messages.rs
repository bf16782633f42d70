//! Direct message endpoints. All require a caller.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{
    json_body, require_caller, ApiContext, ApiPath, ApiQuery, JsonBody, MaybeCaller,
};
use crate::authorization::Operation;
use crate::messaging::{self, NewMessage};
use crate::models::Message;

#[derive(Deserialize)]
pub struct UnreadQuery {
    pub unread: Option<bool>,
}

/// `GET /messages?unread=`
pub async fn list(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
    ApiQuery(query): ApiQuery<UnreadQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let caller = require_caller(caller, Operation::ReadOwnData)?;
    let conn = ctx.open_db()?;
    let unread_only = query.unread.unwrap_or(false);
    Ok(Json(messaging::get_messages(&conn, &caller.user_id, unread_only)?))
}

/// `POST /messages`
pub async fn send(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
    body: JsonBody<NewMessage>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let caller = require_caller(caller, Operation::SendMessage)?;
    let input = json_body(body)?;
    let conn = ctx.open_db()?;
    let message = messaging::send_message(&conn, &caller.user_id, &input)?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// `PUT /messages/:id/read`: recipient only; anyone else sees 404.
pub async fn mark_read(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Message>, ApiError> {
    let caller = require_caller(caller, Operation::MarkRead)?;
    let conn = ctx.open_db()?;
    Ok(Json(messaging::mark_message_as_read(&conn, &id, &caller.user_id)?))
}
