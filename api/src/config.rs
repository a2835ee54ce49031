//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::lookup_host;

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `SMARTFARM_HOST`: IP address or host name to bind to (default: "0.0.0.0")
/// - `SMARTFARM_PORT`: The port to listen on (default: 8000)
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `SMARTFARM_PORT` is set but cannot be parsed as a valid port number
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("SMARTFARM_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("SMARTFARM_PORT")
            .ok()
            .map(|p| p.parse::<u16>())
            .transpose()
            .context("SMARTFARM_PORT must be a valid port number")?
            .unwrap_or(8000);

        Ok(Self { host, port })
    }

    /// Returns the socket address for binding.
    ///
    /// Host names such as `localhost` are resolved; the first address wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot be resolved to any address.
    pub async fn socket_addr(&self) -> Result<SocketAddr> {
        lookup_host((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("Cannot resolve bind address {}:{}", self.host, self.port))?
            .next()
            .with_context(|| format!("No address found for {}:{}", self.host, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}
