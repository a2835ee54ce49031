//! Data models for the SmartFarm telemetry gateway.
//!
//! This module contains the source mapping, query time windows, and the
//! JSON-normalized telemetry record.

pub mod record;
pub mod source;
pub mod window;

pub use record::TelemetryRecord;
pub use source::{Source, TimestampFormat, UnknownSourceError};
pub use window::{parse_timestamp, TimeWindow, WindowError, DEFAULT_LOOKBACK_DAYS};
