//! Database connection module for `MongoDB`.
//!
//! This module loads the connection settings from the environment and builds
//! the pooled driver client shared by every request.

use anyhow::{Context, Result};
use mongodb::options::ClientOptions;
use mongodb::Client;
use shared::storage::MongoTelemetryStore;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

const DEFAULT_PORT: u16 = 27019;
const DEFAULT_DATABASE: &str = "Smart_Framing_Db";
const DEFAULT_AUTH_SOURCE: &str = "admin";
const DEFAULT_SERVER_SELECTION_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_QUERY_TIMEOUT_MS: u64 = 10_000;

/// Errors raised while loading the database configuration.
#[derive(Debug, Error)]
pub enum DatabaseConfigError {
    /// A required variable is not set.
    #[error("Missing MongoDB credentials: {0} is not set")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Why parsing failed.
        reason: String,
    },

    /// A value failed validation (e.g. empty credentials).
    #[error("Invalid MongoDB configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Database configuration loaded from environment variables.
#[derive(Clone, Validate)]
pub struct DatabaseConfig {
    /// Server host name.
    #[validate(length(min = 1, message = "MONGO_HOST cannot be empty"))]
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Username for authentication.
    #[validate(length(min = 1, message = "MONGO_USER cannot be empty"))]
    pub user: String,
    /// Password for authentication.
    #[validate(length(min = 1, message = "MONGO_PASSWORD cannot be empty"))]
    pub password: String,
    /// Database holding the telemetry collections.
    #[validate(length(min = 1, message = "MONGO_DB_NAME cannot be empty"))]
    pub database: String,
    /// Database the user authenticates against.
    pub auth_source: String,
    /// How long the driver waits for a suitable server.
    pub server_selection_timeout: Duration,
    /// Upper bound on a single query.
    pub query_timeout: Duration,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("auth_source", &self.auth_source)
            .field("server_selection_timeout", &self.server_selection_timeout)
            .field("query_timeout", &self.query_timeout)
            .finish()
    }
}

impl DatabaseConfig {
    /// Load database configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MONGO_HOST`: Server host (required)
    /// - `MONGO_USER`: Username (required)
    /// - `MONGO_PASSWORD`: Password (required)
    /// - `MONGO_PORT`: Server port (default: 27019)
    /// - `MONGO_DB_NAME`: Database name (default: "`Smart_Framing_Db`")
    /// - `MONGO_AUTH_SOURCE`: Authentication database (default: "admin")
    /// - `MONGO_SERVER_SELECTION_TIMEOUT_MS`: Server selection timeout (default: 5000)
    /// - `MONGO_QUERY_TIMEOUT_MS`: Per-query timeout (default: 10000)
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or empty, or if a
    /// numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, DatabaseConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load database configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`DatabaseConfig::from_env`].
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, DatabaseConfigError> {
        let required = |name: &'static str| lookup(name).ok_or(DatabaseConfigError::Missing(name));

        let config = Self {
            host: required("MONGO_HOST")?,
            user: required("MONGO_USER")?,
            password: required("MONGO_PASSWORD")?,
            port: parse_or(&lookup, "MONGO_PORT", DEFAULT_PORT)?,
            database: lookup("MONGO_DB_NAME").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            auth_source: lookup("MONGO_AUTH_SOURCE")
                .unwrap_or_else(|| DEFAULT_AUTH_SOURCE.to_string()),
            server_selection_timeout: Duration::from_millis(parse_or(
                &lookup,
                "MONGO_SERVER_SELECTION_TIMEOUT_MS",
                DEFAULT_SERVER_SELECTION_TIMEOUT_MS,
            )?),
            query_timeout: Duration::from_millis(parse_or(
                &lookup,
                "MONGO_QUERY_TIMEOUT_MS",
                DEFAULT_QUERY_TIMEOUT_MS,
            )?),
        };

        config.validate()?;
        Ok(config)
    }

    /// Builds the connection string, percent-encoding the credentials.
    #[must_use]
    pub fn connection_uri(&self) -> String {
        format!(
            "mongodb://{}:{}@{}:{}/?authSource={}",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            urlencoding::encode(&self.auth_source),
        )
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, DatabaseConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| DatabaseConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Database client wrapper providing connection pooling.
#[derive(Clone)]
pub struct Database {
    client: Client,
    name: String,
    query_timeout: Duration,
}

impl Database {
    /// Create a new database client from configuration.
    ///
    /// The driver connects lazily; use the store's `ping` to probe liveness.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string cannot be parsed or the
    /// client cannot be constructed.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(config.connection_uri())
            .await
            .context("Failed to parse MongoDB connection string")?;
        options.server_selection_timeout = Some(config.server_selection_timeout);
        options.app_name = Some("smartfarm-api".to_string());

        let client = Client::with_options(options).context("Failed to create MongoDB client")?;

        Ok(Self {
            client,
            name: config.database.clone(),
            query_timeout: config.query_timeout,
        })
    }

    /// Name of the database in use.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builds the telemetry store backed by this client.
    #[must_use]
    pub fn into_store(self) -> MongoTelemetryStore {
        MongoTelemetryStore::new(self.client, &self.name, self.query_timeout)
    }
}
