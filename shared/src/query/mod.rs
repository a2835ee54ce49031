//! Range query construction.
//!
//! Translates a resolved source and time window into the filter, sort order,
//! and collection a telemetry store executes.

pub mod range;

pub use range::{format_iso_timestamp, RangeQuery};
