//! Source discovery endpoint.

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use shared::models::{Source, TimestampFormat};

/// Public description of a telemetry source.
#[derive(Debug, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Name to use in `/data/{source}`.
    pub name: String,
    /// Backing collection.
    pub collection: String,
    /// `deviceName` value the records are filtered on.
    pub device_name: String,
    /// Field holding the record timestamp.
    pub timestamp_field: String,
    /// How that field is stored.
    pub timestamp_format: TimestampFormat,
}

impl From<Source> for SourceInfo {
    fn from(source: Source) -> Self {
        Self {
            name: source.name().to_string(),
            collection: source.collection().to_string(),
            device_name: source.device_name().to_string(),
            timestamp_field: source.timestamp_field().to_string(),
            timestamp_format: source.timestamp_format(),
        }
    }
}

/// Creates the sources route.
pub fn sources_routes() -> Router {
    Router::new().route("/sources", get(list_sources))
}

async fn list_sources() -> Json<Vec<SourceInfo>> {
    Json(Source::ALL.into_iter().map(SourceInfo::from).collect())
}
