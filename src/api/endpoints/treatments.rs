//! Treatment catalog and the caller's treatment usage.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{json_body, require_caller, ApiContext, ApiQuery, JsonBody, MaybeCaller};
use crate::authorization::Operation;
use crate::models::{Treatment, TreatmentUsage};
use crate::treatments::{self, NewTreatment, TreatmentUsageEntry};

#[derive(Deserialize)]
pub struct TreatmentQuery {
    #[serde(rename = "type")]
    pub treatment_type: Option<String>,
}

/// `GET /treatments?type=`
pub async fn list(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<TreatmentQuery>,
) -> Result<Json<Vec<Treatment>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(treatments::get_treatments(&conn, query.treatment_type.as_deref())?))
}

/// `POST /treatments`
pub async fn create(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
    body: JsonBody<NewTreatment>,
) -> Result<(StatusCode, Json<Treatment>), ApiError> {
    require_caller(caller, Operation::CreateTreatment)?;
    let input = json_body(body)?;
    let conn = ctx.open_db()?;
    let treatment = treatments::create_treatment(&conn, &input)?;
    Ok((StatusCode::CREATED, Json(treatment)))
}

/// `GET /treatments/usage`
pub async fn list_usage(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
) -> Result<Json<Vec<TreatmentUsage>>, ApiError> {
    let caller = require_caller(caller, Operation::ReadOwnData)?;
    let conn = ctx.open_db()?;
    Ok(Json(treatments::get_treatment_usage(&conn, &caller.user_id)?))
}

/// `POST /treatments/usage`
pub async fn record_usage(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
    body: JsonBody<TreatmentUsageEntry>,
) -> Result<(StatusCode, Json<TreatmentUsage>), ApiError> {
    let caller = require_caller(caller, Operation::RecordTreatmentUsage)?;
    let entry = json_body(body)?;
    let conn = ctx.open_db()?;
    let usage = treatments::record_treatment_usage(&conn, &caller.user_id, &entry)?;
    Ok((StatusCode::CREATED, Json(usage)))
}
