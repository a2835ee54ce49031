//! Telemetry storage trait and implementations.
//!
//! Provides the `TelemetryStore` trait for abstracting range reads,
//! a MongoDB-backed implementation for production, and an
//! `InMemoryTelemetryStore` for development and testing.

use crate::models::TelemetryRecord;
use crate::query::RangeQuery;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::error::ErrorKind;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during telemetry store operations.
#[derive(Debug, Error)]
pub enum TelemetryStoreError {
    /// No server could be reached.
    #[error("Database is unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the operation (command or authentication failure).
    #[error("{0}")]
    Query(String),

    /// Any other failure.
    #[error("{0}")]
    Unexpected(String),

    /// Failed to acquire lock on the store.
    #[error("Failed to acquire lock on telemetry store")]
    LockError,
}

impl From<mongodb::error::Error> for TelemetryStoreError {
    fn from(err: mongodb::error::Error) -> Self {
        let detail = err.to_string();
        match &*err.kind {
            ErrorKind::Command(_) | ErrorKind::Authentication { .. } | ErrorKind::Write(_) => {
                Self::Query(detail)
            }
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::DnsResolve { .. } => Self::Unavailable(detail),
            _ => Self::Unexpected(detail),
        }
    }
}

/// Trait for telemetry storage implementations.
///
/// Implementations must be thread-safe (Send + Sync) and are shared by all
/// in-flight requests.
#[async_trait]
pub trait TelemetryStore: Send + Sync {
    /// Returns the records matching `query`, most recently inserted first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or rejects the query.
    async fn find_range(
        &self,
        query: &RangeQuery,
    ) -> Result<Vec<TelemetryRecord>, TelemetryStoreError>;

    /// Lightweight liveness probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the store does not answer.
    async fn ping(&self) -> Result<(), TelemetryStoreError>;

    /// Releases the underlying connection resources.
    async fn shutdown(&self);
}

/// In-memory telemetry store.
///
/// Documents are grouped by collection and kept in insertion order.
/// Queries evaluate [`RangeQuery::matches`], mirroring the filter sent to
/// MongoDB, and return the newest insertions first.
///
/// **Note:** Data is not persisted across restarts.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use shared::bson::{doc, DateTime};
/// use shared::models::{Source, TimeWindow};
/// use shared::query::RangeQuery;
/// use shared::storage::{InMemoryTelemetryStore, TelemetryStore};
///
/// # tokio_test::block_on(async {
/// let store = InMemoryTelemetryStore::new();
/// store.insert("telemetry_data_clean", doc! {
///     "deviceName": "SmartFarm",
///     "timestamp_utc_dt": DateTime::now(),
/// }).unwrap();
///
/// let window = TimeWindow::resolve(None, None, Utc::now()).unwrap();
/// let records = store
///     .find_range(&RangeQuery::new(Source::SmartFarm, window))
///     .await
///     .unwrap();
/// assert_eq!(records.len(), 1);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryTelemetryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl InMemoryTelemetryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store wrapped in an Arc.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Inserts a document, assigning an `ObjectId` if it has no `_id`.
    ///
    /// Returns the document's identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn insert(
        &self,
        collection: &str,
        mut document: Document,
    ) -> Result<Bson, TelemetryStoreError> {
        let id = document
            .entry("_id".to_string())
            .or_insert_with(|| Bson::ObjectId(ObjectId::new()))
            .clone();

        let mut collections = self
            .collections
            .write()
            .map_err(|_| TelemetryStoreError::LockError)?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(id)
    }

    /// Inserts several documents into one collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn insert_many(
        &self,
        collection: &str,
        documents: impl IntoIterator<Item = Document>,
    ) -> Result<Vec<Bson>, TelemetryStoreError> {
        documents
            .into_iter()
            .map(|document| self.insert(collection, document))
            .collect()
    }

    /// Number of documents held in `collection`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn count(&self, collection: &str) -> Result<usize, TelemetryStoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| TelemetryStoreError::LockError)?;
        Ok(collections.get(collection).map_or(0, Vec::len))
    }

    /// Removes every document.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn clear(&self) -> Result<(), TelemetryStoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| TelemetryStoreError::LockError)?;
        collections.clear();
        Ok(())
    }
}

#[async_trait]
impl TelemetryStore for InMemoryTelemetryStore {
    async fn find_range(
        &self,
        query: &RangeQuery,
    ) -> Result<Vec<TelemetryRecord>, TelemetryStoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| TelemetryStoreError::LockError)?;

        let records = collections
            .get(query.collection())
            .map(|documents| {
                documents
                    .iter()
                    .rev()
                    .filter(|document| query.matches(document))
                    .cloned()
                    .map(TelemetryRecord::from_document)
                    .collect()
            })
            .unwrap_or_default();

        Ok(records)
    }

    async fn ping(&self) -> Result<(), TelemetryStoreError> {
        Ok(())
    }

    async fn shutdown(&self) {}
}

/// MongoDB-backed telemetry store.
///
/// Wraps a pooled driver client; cloning is cheap and all clones share the
/// same connection pool.
#[derive(Clone)]
pub struct MongoTelemetryStore {
    client: mongodb::Client,
    database: mongodb::Database,
    query_timeout: Duration,
}

impl MongoTelemetryStore {
    /// Creates a store reading from `database` through `client`.
    ///
    /// Every find is bounded by `query_timeout`, both server-side
    /// (`maxTimeMS`) and on the client.
    #[must_use]
    pub fn new(client: mongodb::Client, database: &str, query_timeout: Duration) -> Self {
        let database = client.database(database);
        Self {
            client,
            database,
            query_timeout,
        }
    }

    /// Creates a new store wrapped in an Arc.
    #[must_use]
    pub fn new_shared(
        client: mongodb::Client,
        database: &str,
        query_timeout: Duration,
    ) -> Arc<Self> {
        Arc::new(Self::new(client, database, query_timeout))
    }
}

#[async_trait]
impl TelemetryStore for MongoTelemetryStore {
    async fn find_range(
        &self,
        query: &RangeQuery,
    ) -> Result<Vec<TelemetryRecord>, TelemetryStoreError> {
        let collection = self.database.collection::<Document>(query.collection());
        let filter = query.filter();

        tracing::debug!(
            collection = query.collection(),
            filter = %filter,
            "Executing range query"
        );

        let fetch = async {
            let cursor = collection
                .find(filter)
                .sort(RangeQuery::sort_order())
                .max_time(self.query_timeout)
                .await?;
            cursor.try_collect::<Vec<Document>>().await
        };

        let documents = tokio::time::timeout(self.query_timeout, fetch)
            .await
            .map_err(|_| {
                TelemetryStoreError::Unavailable(format!(
                    "query did not complete within {} ms",
                    self.query_timeout.as_millis()
                ))
            })??;

        Ok(documents
            .into_iter()
            .map(TelemetryRecord::from_document)
            .collect())
    }

    async fn ping(&self) -> Result<(), TelemetryStoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn shutdown(&self) {
        self.client.clone().shutdown().await;
    }
}
