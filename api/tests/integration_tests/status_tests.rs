//! Integration tests for the status, health, and discovery endpoints.
//!
//! Tests cover:
//! - Root status endpoint, with and without a database
//! - Health check in connected and degraded mode
//! - Source listing

use axum::http::StatusCode;

use super::common::{disconnected_app, get, test_app};

#[tokio::test]
async fn test_root_status() {
    let (app, _store) = test_app();

    let (status, response) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "SmartFarm API is running!");
}

#[tokio::test]
async fn test_root_status_without_database() {
    let (status, response) = get(disconnected_app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "SmartFarm API is running!");
}

#[tokio::test]
async fn test_health_check() {
    let (app, _store) = test_app();

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "smartfarm-api");
}

#[tokio::test]
async fn test_health_check_degraded() {
    let (status, response) = get(disconnected_app(), "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response["status"], "degraded");
}

#[tokio::test]
async fn test_sources_listing() {
    let (app, _store) = test_app();

    let (status, response) = get(app, "/sources").await;
    assert_eq!(status, StatusCode::OK);

    let sources = response.as_array().unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0]["name"], "smartfarm");
    assert_eq!(sources[0]["collection"], "telemetry_data_clean");
    assert_eq!(sources[1]["name"], "raspberrypi");
    assert_eq!(sources[1]["timestamp_format"], "iso8601");
}
