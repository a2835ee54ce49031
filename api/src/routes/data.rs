//! Telemetry query endpoint.
//!
//! `GET /data/{source}?start_date=..&end_date=..` returns the source's records
//! inside the window as a JSON array, newest first. An empty window is
//! answered with 404 rather than an empty array.

use crate::error::GatewayError;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use shared::models::TelemetryRecord;

/// Query parameters for the data endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct DataQueryParams {
    /// Inclusive lower bound (ISO-8601). Defaults to seven days ago.
    pub start_date: Option<String>,
    /// Inclusive upper bound (ISO-8601). Defaults to now.
    pub end_date: Option<String>,
}

/// Creates the data routes.
pub fn data_routes(state: AppState) -> Router {
    Router::new()
        .route("/data/{source}", get(get_telemetry_data))
        .with_state(state)
}

async fn get_telemetry_data(
    State(state): State<AppState>,
    Path(source): Path<String>,
    params: Result<Query<DataQueryParams>, QueryRejection>,
) -> Result<Json<Vec<TelemetryRecord>>, GatewayError> {
    let Query(params) = params.map_err(|rejection| GatewayError::BadRequest(rejection.body_text()))?;

    // An empty parameter (`?start_date=`) means "use the default".
    let start_date = params.start_date.as_deref().filter(|s| !s.trim().is_empty());
    let end_date = params.end_date.as_deref().filter(|s| !s.trim().is_empty());

    let records = state
        .gateway()
        .fetch(&source, start_date, end_date, Utc::now())
        .await?;

    Ok(Json(records))
}
