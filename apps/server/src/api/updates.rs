use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::MonthlyUpdateRequest,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tidecast_core::update::UpdateOutcome;

fn outcome_response(outcome: UpdateOutcome) -> (StatusCode, Json<UpdateOutcome>) {
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(outcome))
}

async fn update_forecast(
    Path(entity): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<UpdateOutcome>)> {
    state.orchestrator.registry().resolve(&entity)?;

    let records = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Array(records)) => records,
        _ => {
            return Err(ApiError::BadRequest(
                "Invalid input: expecting a JSON list of data points".to_string(),
            ))
        }
    };

    let outcome = state.orchestrator.manual_update(&entity, records).await?;
    Ok(outcome_response(outcome))
}

async fn trigger_monthly_update(
    Path(entity): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<UpdateOutcome>)> {
    state.orchestrator.registry().resolve(&entity)?;

    let request: MonthlyUpdateRequest = serde_json::from_slice(&body).map_err(|e| {
        ApiError::BadRequest(format!("Invalid request body: {}", e))
    })?;
    let (Some(year), Some(month)) = (request.year, request.month) else {
        return Err(ApiError::BadRequest(
            "Missing 'year' or 'month' in request body".to_string(),
        ));
    };
    let year = i32::try_from(year)
        .map_err(|_| ApiError::BadRequest(format!("Invalid year: {}", year)))?;
    let month = u32::try_from(month)
        .map_err(|_| ApiError::BadRequest(format!("Invalid month: {}", month)))?;

    let outcome = state
        .orchestrator
        .monthly_update(&entity, year, month)
        .await?;
    Ok(outcome_response(outcome))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/update_forecast/{entity}", post(update_forecast))
        .route("/trigger_monthly_update/{entity}", post(trigger_monthly_update))
}
