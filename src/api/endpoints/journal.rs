//! Symptom catalog and symptom journal endpoints.
//!
//! - `GET /symptoms`: public catalog
//! - `POST /symptoms`: admin only
//! - `POST /symptoms/log`: record an occurrence for the caller
//! - `GET /symptoms/logs?limit=`: the caller's recent entries

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{json_body, require_caller, ApiContext, ApiQuery, JsonBody, MaybeCaller};
use crate::authorization::Operation;
use crate::journal::{self, NewSymptom, SymptomLogEntry};
use crate::models::{Symptom, SymptomLog};

/// `GET /symptoms`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Symptom>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(journal::get_symptoms(&conn)?))
}

/// `POST /symptoms`
pub async fn create(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
    body: JsonBody<NewSymptom>,
) -> Result<(StatusCode, Json<Symptom>), ApiError> {
    require_caller(caller, Operation::CreateSymptom)?;
    let input = json_body(body)?;
    let conn = ctx.open_db()?;
    let symptom = journal::create_symptom(&conn, &input)?;
    Ok((StatusCode::CREATED, Json(symptom)))
}

/// `POST /symptoms/log`
pub async fn record(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
    body: JsonBody<SymptomLogEntry>,
) -> Result<(StatusCode, Json<SymptomLog>), ApiError> {
    let caller = require_caller(caller, Operation::LogSymptom)?;
    let entry = json_body(body)?;
    let conn = ctx.open_db()?;
    let log = journal::log_symptom(&conn, &caller.user_id, &entry)?;
    Ok((StatusCode::CREATED, Json(log)))
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

/// `GET /symptoms/logs`
pub async fn history(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<Json<Vec<SymptomLog>>, ApiError> {
    let caller = require_caller(caller, Operation::ReadOwnData)?;
    let conn = ctx.open_db()?;
    Ok(Json(journal::get_symptom_logs(&conn, &caller.user_id, query.limit)?))
}
