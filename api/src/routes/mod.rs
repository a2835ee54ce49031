//! API route definitions.
//!
//! This module organizes all HTTP routes for the SmartFarm API server.

mod data;
mod health;
mod sources;
mod status;

pub use data::data_routes;
pub use health::health_routes;
pub use sources::sources_routes;
pub use status::status_routes;
