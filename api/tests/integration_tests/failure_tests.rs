//! Integration tests for database failure handling.
//!
//! Tests cover:
//! - Missing connection (503 on every request, process keeps serving)
//! - Store-reported query errors (500 with the store's detail)
//! - Unexpected errors (500 with a generic prefix)

use axum::http::StatusCode;
use shared::storage::TelemetryStoreError;

use super::common::{disconnected_app, failing_app, get};

#[tokio::test]
async fn test_no_connection_is_service_unavailable_on_every_request() {
    let app = disconnected_app();

    for uri in ["/data/smartfarm", "/data/raspberrypi", "/data/smartfarm"] {
        let (status, response) = get(app.clone(), uri).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response["detail"], api::UNAVAILABLE_DETAIL);
    }

    // Still serving afterwards.
    let (status, _) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_lost_connection_is_service_unavailable() {
    let app = failing_app(|| {
        TelemetryStoreError::Unavailable("Server selection timeout".to_string())
    });

    let (status, response) = get(app, "/data/smartfarm").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(response["detail"]
        .as_str()
        .unwrap()
        .starts_with(api::UNAVAILABLE_DETAIL));
}

#[tokio::test]
async fn test_query_error_is_upstream_failure() {
    let app = failing_app(|| {
        TelemetryStoreError::Query(
            "Command failed: not authorized on Smart_Framing_Db to execute command find"
                .to_string(),
        )
    });

    let (status, response) = get(app, "/data/raspberrypi").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response["detail"],
        "Database query failed: Command failed: not authorized on Smart_Framing_Db to execute command find"
    );
}

#[tokio::test]
async fn test_unexpected_error_is_generic_failure() {
    let app = failing_app(|| TelemetryStoreError::Unexpected("cursor exhausted".to_string()));

    let (status, response) = get(app, "/data/smartfarm").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response["detail"],
        "Unexpected error while querying data: cursor exhausted"
    );
}

#[tokio::test]
async fn test_unknown_source_wins_over_failing_store() {
    let app = failing_app(|| TelemetryStoreError::Unexpected("unreachable".to_string()));

    let (status, _) = get(app, "/data/greenhouse").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_failing_store() {
    let app = failing_app(|| TelemetryStoreError::Unavailable("no primary".to_string()));

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response["database"], "unavailable");
}
