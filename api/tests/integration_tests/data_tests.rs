//! Integration tests for telemetry range queries.
//!
//! Tests cover:
//! - Default seven-day window
//! - Inclusive window bounds for native and string timestamps
//! - Source name resolution and the not-found policies
//! - Identifier normalization and pass-through of other fields

use axum::http::StatusCode;
use chrono::{Duration, TimeZone, Utc};

use super::common::{get, query_param, raspberry_doc, smartfarm_doc, test_app};

#[tokio::test]
async fn test_default_window_returns_last_seven_days() {
    let (app, store) = test_app();
    let now = Utc::now();

    for days in [10, 3, 1] {
        let mut doc = smartfarm_doc(now - Duration::days(days));
        doc.insert("age_days", days);
        store.insert("telemetry_data_clean", doc).unwrap();
    }

    let (status, response) = get(app, "/data/smartfarm").await;
    assert_eq!(status, StatusCode::OK);

    let records = response.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["age_days"], 1);
    assert_eq!(records[1]["age_days"], 3);
}

#[tokio::test]
async fn test_source_name_is_case_insensitive() {
    let (app, store) = test_app();
    store
        .insert("telemetry_data_clean", smartfarm_doc(Utc::now() - Duration::hours(1)))
        .unwrap();

    for uri in ["/data/smartfarm", "/data/SmartFarm", "/data/SMARTFARM"] {
        let (status, response) = get(app.clone(), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(response.as_array().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_unknown_source_is_not_found() {
    let (app, _store) = test_app();

    let (status, response) = get(app, "/data/unknown-source").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let detail = response["detail"].as_str().unwrap();
    assert!(detail.contains("smartfarm"));
    assert!(detail.contains("raspberrypi"));
}

#[tokio::test]
async fn test_empty_range_is_not_found() {
    let (app, store) = test_app();
    store
        .insert("telemetry_data_clean", smartfarm_doc(Utc::now() - Duration::days(30)))
        .unwrap();

    let (status, response) = get(app, "/data/smartfarm").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["detail"], "No data found for the specified range.");
}

#[tokio::test]
async fn test_native_bounds_are_inclusive() {
    let (app, store) = test_app();
    let start = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
    let ms = Duration::milliseconds(1);

    for (label, ts) in [
        ("before", start - ms),
        ("start", start),
        ("end", end),
        ("after", end + ms),
    ] {
        let mut doc = smartfarm_doc(ts);
        doc.insert("label", label);
        store.insert("telemetry_data_clean", doc).unwrap();
    }

    let uri = format!(
        "/data/smartfarm?start_date={}&end_date={}",
        query_param(start),
        query_param(end)
    );
    let (status, response) = get(app, &uri).await;
    assert_eq!(status, StatusCode::OK);

    let labels: Vec<&str> = response
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["end", "start"]);
}

#[tokio::test]
async fn test_string_bounds_are_inclusive() {
    let (app, store) = test_app();
    let start = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2025, 6, 1, 6, 0, 0).unwrap();
    let us = Duration::microseconds(1);

    for (label, ts) in [
        ("before", start - us),
        ("start", start),
        ("middle", start + Duration::hours(3)),
        ("end", end),
        ("after", end + us),
    ] {
        let mut doc = raspberry_doc(ts);
        doc.insert("label", label);
        store.insert("raspberry_pi_telemetry_clean", doc).unwrap();
    }

    let uri = "/data/raspberrypi?start_date=2025-06-01T00:00:00&end_date=2025-06-01T06:00:00";
    let (status, response) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK);

    let labels: Vec<&str> = response
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["end", "middle", "start"]);
}

#[tokio::test]
async fn test_only_start_date_supplied() {
    let (app, store) = test_app();
    let now = Utc::now();
    store
        .insert_many(
            "telemetry_data_clean",
            [
                smartfarm_doc(now - Duration::days(20)),
                smartfarm_doc(now - Duration::days(12)),
                smartfarm_doc(now - Duration::hours(1)),
            ],
        )
        .unwrap();

    let uri = format!(
        "/data/smartfarm?start_date={}",
        query_param(now - Duration::days(14))
    );
    let (status, response) = get(app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_records_are_normalized() {
    let (app, store) = test_app();
    store
        .insert("telemetry_data_clean", smartfarm_doc(Utc::now() - Duration::hours(1)))
        .unwrap();

    let (status, response) = get(app, "/data/smartfarm").await;
    assert_eq!(status, StatusCode::OK);

    let record = &response.as_array().unwrap()[0];
    let id = record["_id"].as_str().unwrap();
    assert_eq!(id.len(), 24);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

    assert!(record["timestamp_utc_dt"].is_string());
    assert_eq!(record["deviceName"], "SmartFarm");
    assert_eq!(record["temperature"], 22.4);
    assert_eq!(record["sensors"]["soil_moisture"], serde_json::json!([41, 43]));
    assert_eq!(record["sensors"]["light"]["lux"], 1200);
}

#[tokio::test]
async fn test_sources_do_not_leak_into_each_other() {
    let (app, store) = test_app();
    let recent = Utc::now() - Duration::hours(1);
    store
        .insert("telemetry_data_clean", smartfarm_doc(recent))
        .unwrap();
    store
        .insert("raspberry_pi_telemetry_clean", raspberry_doc(recent))
        .unwrap();

    let (_, farm) = get(app.clone(), "/data/smartfarm").await;
    let (_, pi) = get(app, "/data/raspberrypi").await;

    let farm = farm.as_array().unwrap();
    let pi = pi.as_array().unwrap();
    assert_eq!(farm.len(), 1);
    assert_eq!(pi.len(), 1);
    assert_eq!(farm[0]["deviceName"], "SmartFarm");
    assert_eq!(pi[0]["deviceName"], "raspberry_pi_status");
}

#[tokio::test]
async fn test_inverted_window_is_bad_request() {
    let (app, _store) = test_app();

    let uri = "/data/smartfarm?start_date=2025-06-02T00:00:00&end_date=2025-06-01T00:00:00";
    let (status, response) = get(app, uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["detail"]
        .as_str()
        .unwrap()
        .contains("must not be after"));
}
