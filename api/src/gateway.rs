//! Query gateway.
//!
//! Owns the telemetry store handle and turns a source name plus optional
//! date bounds into a range query, its execution, and a shaped result.

use crate::db::{Database, DatabaseConfig};
use crate::error::{GatewayError, NO_DATA_DETAIL, UNAVAILABLE_DETAIL};
use chrono::{DateTime, Utc};
use shared::models::{parse_timestamp, Source, TelemetryRecord, TimeWindow};
use shared::query::RangeQuery;
use shared::storage::TelemetryStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Translates read requests into store queries.
///
/// A gateway without a store is a valid value: every data request then
/// reports [`GatewayError::ServiceUnavailable`].
pub struct Gateway {
    store: Option<Arc<dyn TelemetryStore>>,
    shut_down: AtomicBool,
}

impl Gateway {
    /// Creates a gateway reading from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn TelemetryStore>) -> Self {
        Self {
            store: Some(store),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Creates a gateway with no database connection.
    #[must_use]
    pub fn disconnected() -> Self {
        Self {
            store: None,
            shut_down: AtomicBool::new(false),
        }
    }

    /// Connects to `MongoDB` and probes it once.
    ///
    /// Never fails: if the client cannot be built the gateway starts
    /// disconnected, and if the probe fails the client is kept so requests
    /// succeed again once the server becomes reachable.
    pub async fn bootstrap(config: &DatabaseConfig) -> Self {
        let database = match Database::connect(config).await {
            Ok(database) => database,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    cause = %e.root_cause(),
                    "Could not create MongoDB client, starting without a database"
                );
                return Self::disconnected();
            }
        };

        let name = database.name().to_string();
        let store = database.into_store();
        match store.ping().await {
            Ok(()) => tracing::info!(
                host = %config.host,
                database = %name,
                "Connected to MongoDB"
            ),
            Err(e) => tracing::warn!(
                host = %config.host,
                error = %e,
                "MongoDB ping failed, data requests will report 503 until it is reachable"
            ),
        }

        Self::new(Arc::new(store))
    }

    /// Returns true if a store handle is held.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    /// Probes the store.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ServiceUnavailable`] if there is no store or it
    /// does not answer.
    pub async fn ping(&self) -> Result<(), GatewayError> {
        let store = self.store()?;
        store
            .ping()
            .await
            .map_err(|e| GatewayError::ServiceUnavailable(format!("{UNAVAILABLE_DETAIL} ({e})")))
    }

    /// Fetches telemetry for `source` between the given bounds.
    ///
    /// Missing bounds default to the trailing seven days ending at `now`.
    /// An empty result is reported as [`GatewayError::NotFound`].
    ///
    /// # Errors
    ///
    /// - [`GatewayError::NotFound`] for an unknown source or an empty result
    /// - [`GatewayError::BadRequest`] for unparsable or inverted bounds
    /// - [`GatewayError::ServiceUnavailable`] without a reachable database
    /// - [`GatewayError::Upstream`] / [`GatewayError::Unexpected`] when the query fails
    pub async fn fetch(
        &self,
        source: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<TelemetryRecord>, GatewayError> {
        let source: Source = source.parse()?;

        let start = start_date
            .map(|raw| parse_timestamp("start_date", raw))
            .transpose()?;
        let end = end_date
            .map(|raw| parse_timestamp("end_date", raw))
            .transpose()?;
        let window = TimeWindow::resolve(start, end, now)?;

        let store = self.store()?;
        let query = RangeQuery::new(source, window);
        let records = store.find_range(&query).await?;

        if records.is_empty() {
            return Err(GatewayError::NotFound(NO_DATA_DETAIL.to_string()));
        }

        tracing::debug!(
            source = %source,
            start = %window.start(),
            end = %window.end(),
            count = records.len(),
            "Fetched telemetry"
        );
        Ok(records)
    }

    /// Releases the store connection. Safe to call repeatedly.
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(store) = &self.store {
            store.shutdown().await;
            tracing::info!("Database connection closed");
        }
    }

    fn store(&self) -> Result<&Arc<dyn TelemetryStore>, GatewayError> {
        self.store.as_ref().ok_or_else(GatewayError::unavailable)
    }
}
