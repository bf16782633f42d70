//! Condition catalog and the caller's own conditions.
//!
//! - `GET /conditions?category=`: public catalog
//! - `POST /conditions`: admin only
//! - `GET|POST /conditions/user`: the caller's diagnoses

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{json_body, require_caller, ApiContext, ApiQuery, JsonBody, MaybeCaller};
use crate::authorization::Operation;
use crate::conditions::{self, NewCondition, NewUserCondition};
use crate::models::{Condition, UserCondition};

#[derive(Deserialize)]
pub struct ConditionQuery {
    pub category: Option<String>,
}

/// `GET /conditions`
pub async fn list(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<ConditionQuery>,
) -> Result<Json<Vec<Condition>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(conditions::get_conditions(&conn, query.category.as_deref())?))
}

/// `POST /conditions`
pub async fn create(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
    body: JsonBody<NewCondition>,
) -> Result<(StatusCode, Json<Condition>), ApiError> {
    require_caller(caller, Operation::CreateCondition)?;
    let input = json_body(body)?;
    let conn = ctx.open_db()?;
    let condition = conditions::create_condition(&conn, &input)?;
    Ok((StatusCode::CREATED, Json(condition)))
}

/// `GET /conditions/user`
pub async fn list_mine(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
) -> Result<Json<Vec<UserCondition>>, ApiError> {
    let caller = require_caller(caller, Operation::ReadOwnData)?;
    let conn = ctx.open_db()?;
    Ok(Json(conditions::get_user_conditions(&conn, &caller.user_id)?))
}

/// `POST /conditions/user`
pub async fn add_mine(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
    body: JsonBody<NewUserCondition>,
) -> Result<(StatusCode, Json<UserCondition>), ApiError> {
    let caller = require_caller(caller, Operation::AddUserCondition)?;
    let input = json_body(body)?;
    let conn = ctx.open_db()?;
    let added = conditions::add_user_condition(&conn, &caller.user_id, &input)?;
    Ok((StatusCode::CREATED, Json(added)))
}
