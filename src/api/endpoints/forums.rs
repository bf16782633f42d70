//! Forum endpoints.

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
use crate::forums::{self, NewForum};
use crate::models::Forum;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumQuery {
    pub condition_id: Option<Uuid>,
}

/// `GET /forums?conditionId=`
pub async fn list(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<ForumQuery>,
) -> Result<Json<Vec<Forum>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(forums::get_forums(&conn, query.condition_id.as_ref())?))
}

/// `POST /forums`: admins and doctors.
pub async fn create(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
    body: JsonBody<NewForum>,
) -> Result<(StatusCode, Json<Forum>), ApiError> {
    let caller = require_caller(caller, Operation::CreateForum)?;
    let input = json_body(body)?;
    let conn = ctx.open_db()?;
    let forum = forums::create_forum(&conn, &caller.user_id, &input)?;
    Ok((StatusCode::CREATED, Json(forum)))
}

/// `GET /forums/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Forum>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(forums::get_forum(&conn, &id)?))
}
