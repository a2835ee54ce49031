//! Telemetry record model.
//!
//! Records are opaque documents owned by the upstream ingestion pipeline.
//! The only transformation applied here is mapping store-native types onto
//! plain JSON so the rest of the system never handles BSON values.

use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A telemetry record normalized to JSON.
///
/// Serializes transparently as the underlying JSON object.
///
/// # Example
///
/// ```
/// use shared::bson::{doc, oid::ObjectId};
/// use shared::models::TelemetryRecord;
///
/// let id = ObjectId::new();
/// let record = TelemetryRecord::from_document(doc! {
///     "_id": id,
///     "deviceName": "SmartFarm",
///     "soil_moisture": 41.5,
/// });
///
/// assert_eq!(record.id(), Some(id.to_hex().as_str()));
/// assert_eq!(record.device_name(), Some("SmartFarm"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TelemetryRecord(Map<String, Value>);

impl TelemetryRecord {
    /// Converts a stored document into a JSON record.
    ///
    /// Object identifiers become their hex string, date-times become RFC 3339
    /// strings, and everything else takes its relaxed extended-JSON form.
    /// Nested documents and arrays are converted recursively.
    #[must_use]
    pub fn from_document(document: Document) -> Self {
        Self(
            document
                .into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        )
    }

    /// The record identifier, if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get("_id").and_then(Value::as_str)
    }

    /// The `deviceName` field, if present.
    #[must_use]
    pub fn device_name(&self) -> Option<&str> {
        self.0.get("deviceName").and_then(Value::as_str)
    }

    /// Looks up a top-level field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map_or_else(|_| Value::from(dt.timestamp_millis()), Value::String),
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}
