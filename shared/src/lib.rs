//! SmartFarm Shared Library
//!
//! This crate contains the types and storage backends shared across the
//! SmartFarm telemetry gateway.
//!
//! # Modules
//!
//! - [`models`] - Telemetry sources, time windows, and records
//! - [`query`] - Range query construction
//! - [`storage`] - Storage traits and implementations
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use shared::models::{Source, TimeWindow};
//! use shared::query::RangeQuery;
//!
//! let source: Source = "raspberrypi".parse().unwrap();
//! let window = TimeWindow::resolve(None, None, Utc::now()).unwrap();
//! let query = RangeQuery::new(source, window);
//!
//! assert_eq!(query.collection(), "raspberry_pi_telemetry_clean");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod models;
pub mod query;
pub mod storage;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use mongodb::bson;
pub use serde;
pub use serde_json;
