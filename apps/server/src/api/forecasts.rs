use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState, models::HistoryPoint};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tidecast_core::forecast::Forecast;

async fn get_forecast(
    Path(entity): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Forecast>> {
    let forecast = state.orchestrator.get_forecast(&entity).await?;
    Ok(Json(forecast))
}

async fn get_historical_data(
    Path(entity): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<HistoryPoint>>> {
    let series = state.orchestrator.get_history(&entity).await?;
    Ok(Json(series.points().iter().map(HistoryPoint::from).collect()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/forecast/{entity}", get(get_forecast))
        .route("/historical_data/{entity}", get(get_historical_data))
}
