//! Gateway error taxonomy and its HTTP mapping.
//!
//! Every failure reaching a handler boundary becomes a JSON body of the form
//! `{"detail": "..."}` with the matching status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::models::{UnknownSourceError, WindowError};
use shared::storage::TelemetryStoreError;
use thiserror::Error;

/// Detail returned when no records fall inside the requested window.
pub const NO_DATA_DETAIL: &str = "No data found for the specified range.";

/// Detail returned when no database connection is available.
pub const UNAVAILABLE_DETAIL: &str =
    "Database connection is not available. The backend service is down.";

/// Errors surfaced to API callers.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Unknown source or empty result set.
    #[error("{0}")]
    NotFound(String),

    /// Malformed or inconsistent query parameters.
    #[error("{0}")]
    BadRequest(String),

    /// No live database connection.
    #[error("{0}")]
    ServiceUnavailable(String),

    /// The database rejected the query.
    #[error("Database query failed: {0}")]
    Upstream(String),

    /// Anything else that went wrong while querying.
    #[error("Unexpected error while querying data: {0}")]
    Unexpected(String),
}

impl GatewayError {
    /// The HTTP status this error maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The error raised when no connection was ever established.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::ServiceUnavailable(UNAVAILABLE_DETAIL.to_string())
    }
}

/// JSON error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable description of the failure.
    pub detail: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (
            status,
            Json(ErrorBody {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<UnknownSourceError> for GatewayError {
    fn from(err: UnknownSourceError) -> Self {
        Self::NotFound(err.to_string())
    }
}

impl From<WindowError> for GatewayError {
    fn from(err: WindowError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<TelemetryStoreError> for GatewayError {
    fn from(err: TelemetryStoreError) -> Self {
        match err {
            TelemetryStoreError::Unavailable(detail) => {
                Self::ServiceUnavailable(format!("{UNAVAILABLE_DETAIL} ({detail})"))
            }
            TelemetryStoreError::Query(detail) => Self::Upstream(detail),
            TelemetryStoreError::Unexpected(detail) => Self::Unexpected(detail),
            err @ TelemetryStoreError::LockError => Self::Unexpected(err.to_string()),
        }
    }
}
