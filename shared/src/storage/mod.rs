//! Storage traits and implementations.
//!
//! This module provides abstractions for reading telemetry.
//! The `TelemetryStore` trait defines the interface for range reads, allowing
//! different implementations (MongoDB, in-memory).

pub mod telemetry_store;

pub use telemetry_store::{
    InMemoryTelemetryStore, MongoTelemetryStore, TelemetryStore, TelemetryStoreError,
};
