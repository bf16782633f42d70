//! Aggregate endpoints over the caller's own data.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{require_caller, ApiContext, ApiQuery, MaybeCaller};
use crate::authorization::Operation;
use crate::stats::{self, SymptomStats, TreatmentEffect, DEFAULT_WINDOW_DAYS};

#[derive(Deserialize)]
pub struct WindowQuery {
    pub days: Option<i64>,
}

/// `GET /symptoms/stats?days=` (default 30)
pub async fn symptoms(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
    ApiQuery(query): ApiQuery<WindowQuery>,
) -> Result<Json<SymptomStats>, ApiError> {
    let caller = require_caller(caller, Operation::ReadOwnData)?;
    let conn = ctx.open_db()?;
    let days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    Ok(Json(stats::symptom_stats(&conn, &caller.user_id, days)?))
}

/// `GET /treatments/stats`
pub async fn treatments(
    State(ctx): State<ApiContext>,
    caller: MaybeCaller,
) -> Result<Json<Vec<TreatmentEffect>>, ApiError> {
    let caller = require_caller(caller, Operation::ReadOwnData)?;
    let conn = ctx.open_db()?;
    Ok(Json(stats::treatment_stats(&conn, &caller.user_id)?))
}
