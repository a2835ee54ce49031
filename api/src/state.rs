//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use crate::gateway::Gateway;
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// Cloning is cheap; all clones share the same gateway.
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<Gateway>,
}

impl AppState {
    /// Creates a new application state around `gateway`.
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }

    /// Creates a state whose gateway has no database connection.
    #[must_use]
    pub fn disconnected() -> Self {
        Self::new(Gateway::disconnected())
    }

    /// Returns a reference to the query gateway.
    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        self.gateway.as_ref()
    }
}
