//! SmartFarm CLI
//!
//! Command-line client for the SmartFarm telemetry API.
//!
//! # Usage
//!
//! ```bash
//! smartfarm --help
//! smartfarm status
//! smartfarm data smartfarm --start 2025-09-01T00:00:00 --end 2025-09-02T00:00:00
//! ```

#![deny(unsafe_code)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::Url;
use serde_json::Value;

/// SmartFarm CLI - query sensor telemetry from the command line
#[derive(Parser)]
#[command(name = "smartfarm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API server URL
    #[arg(
        short,
        long,
        env = "SMARTFARM_API_URL",
        default_value = "http://localhost:8000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the API server is running
    Status,
    /// Check API server and database health
    Health,
    /// List the available telemetry sources
    Sources,
    /// Fetch telemetry for a source
    Data {
        /// Source name (smartfarm or raspberrypi)
        source: String,
        /// Inclusive start of the window (ISO-8601, default: 7 days ago)
        #[arg(long)]
        start: Option<String>,
        /// Inclusive end of the window (ISO-8601, default: now)
        #[arg(long)]
        end: Option<String>,
    },
}

/// Builds the request URL for `command` against `base`.
fn request_url(base: &str, command: &Commands) -> Result<Url> {
    let base = Url::parse(base).with_context(|| format!("Invalid API URL: {base}"))?;

    let mut url = match command {
        Commands::Status => base.join("/")?,
        Commands::Health => base.join("/health")?,
        Commands::Sources => base.join("/sources")?,
        Commands::Data { source, .. } => {
            let mut url = base.join("/data/")?;
            url.path_segments_mut()
                .map_err(|()| anyhow::anyhow!("API URL cannot be a base: {base}"))?
                .pop_if_empty()
                .push(source);
            url
        }
    };

    if let Commands::Data { start, end, .. } = command {
        let mut pairs = url.query_pairs_mut();
        if let Some(start) = start {
            pairs.append_pair("start_date", start);
        }
        if let Some(end) = end {
            pairs.append_pair("end_date", end);
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}

async fn run(api_url: &str, command: &Commands) -> Result<()> {
    let url = request_url(api_url, command)?;
    tracing::debug!(%url, "Sending request");

    let response = reqwest::get(url.clone())
        .await
        .with_context(|| format!("Failed to reach SmartFarm API at {url}"))?;
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .context("SmartFarm API returned a non-JSON body")?;

    if !status.is_success() {
        let detail = body["detail"].as_str().unwrap_or("no detail given");
        bail!("{status}: {detail}");
    }

    if let (Commands::Data { .. }, Some(records)) = (command, body.as_array()) {
        eprintln!("{} record(s)", records.len());
    }
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(command) => run(&cli.api_url, &command).await,
        None => {
            println!("SmartFarm CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
            Ok(())
        }
    }
}
