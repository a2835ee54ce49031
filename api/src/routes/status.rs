//! Root status endpoint.

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};

/// Display name used in the liveness message.
pub const SERVICE_NAME: &str = "SmartFarm API";

/// Liveness payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Fixed "running" message.
    pub status: String,
}

/// Creates the status route.
pub fn status_routes() -> Router {
    Router::new().route("/", get(read_root))
}

/// Reports that the process is up. Does not touch the database.
async fn read_root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: format!("{SERVICE_NAME} is running!"),
    })
}
