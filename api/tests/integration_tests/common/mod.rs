//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration tests,
//! including test app setup, document builders, and HTTP request helpers.

use api::{create_router, AppState, Gateway};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use shared::bson::{doc, DateTime as BsonDateTime, Document};
use shared::models::TelemetryRecord;
use shared::query::{format_iso_timestamp, RangeQuery};
use shared::storage::{InMemoryTelemetryStore, TelemetryStore, TelemetryStoreError};
use std::sync::Arc;

/// Creates a test router over a fresh in-memory store.
///
/// # Returns
///
/// A tuple containing the configured router and the store backing it.
pub fn test_app() -> (Router, Arc<InMemoryTelemetryStore>) {
    let store = InMemoryTelemetryStore::new_shared();
    let state = AppState::new(Gateway::new(store.clone()));
    (create_router(state), store)
}

/// Creates a test router whose gateway never connected to a database.
pub fn disconnected_app() -> Router {
    create_router(AppState::disconnected())
}

/// Creates a test router whose store fails every operation.
pub fn failing_app(error: fn() -> TelemetryStoreError) -> Router {
    let state = AppState::new(Gateway::new(Arc::new(FailingStore { error })));
    create_router(state)
}

/// A store that answers every call with the configured error.
pub struct FailingStore {
    error: fn() -> TelemetryStoreError,
}

#[async_trait]
impl TelemetryStore for FailingStore {
    async fn find_range(
        &self,
        _query: &RangeQuery,
    ) -> Result<Vec<TelemetryRecord>, TelemetryStoreError> {
        Err((self.error)())
    }

    async fn ping(&self) -> Result<(), TelemetryStoreError> {
        Err((self.error)())
    }

    async fn shutdown(&self) {}
}

/// A SmartFarm sensor document with a native timestamp.
pub fn smartfarm_doc(ts: DateTime<Utc>) -> Document {
    doc! {
        "deviceName": "SmartFarm",
        "timestamp_utc_dt": BsonDateTime::from_millis(ts.timestamp_millis()),
        "temperature": 22.4,
        "sensors": { "soil_moisture": [41, 43], "light": { "lux": 1200 } },
    }
}

/// A Raspberry Pi status document with a string timestamp.
pub fn raspberry_doc(ts: DateTime<Utc>) -> Document {
    doc! {
        "deviceName": "raspberry_pi_status",
        "timestamp_utc_dt": format_iso_timestamp(ts),
        "cpu_temp": 51.0,
    }
}

/// Helper to make a GET request.
///
/// # Arguments
///
/// * `app` - The Axum router to send the request to
/// * `uri` - The URI path to GET from
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Formats an instant for use in a query string.
pub fn query_param(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
