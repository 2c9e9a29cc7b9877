//! Configuration for the tracker daemon

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use common::error::{Error, Result};
use market_feed::client::FeedConfig;
use recorder::SinkSpec;

/// Default seconds between polling cycles
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3600;

/// Which sink receives the captured records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Table,
    File,
}

impl FromStr for SinkKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(SinkKind::Table),
            "file" => Ok(SinkKind::File),
            other => Err(Error::ConfigurationError(format!(
                "Unknown sink kind: {} (expected \"table\" or \"file\")",
                other
            ))),
        }
    }
}

/// One-shot or continuous polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Once,
    Loop,
}

impl FromStr for RunMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "once" => Ok(RunMode::Once),
            "loop" => Ok(RunMode::Loop),
            other => Err(Error::ConfigurationError(format!(
                "Unknown run mode: {} (expected \"once\" or \"loop\")",
                other
            ))),
        }
    }
}

/// Whether a fetch failure aborts the process or degrades to partial data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    Strict,
    Lenient,
}

impl FromStr for FailureMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(FailureMode::Strict),
            "lenient" => Ok(FailureMode::Lenient),
            other => Err(Error::ConfigurationError(format!(
                "Unknown failure mode: {} (expected \"strict\" or \"lenient\")",
                other
            ))),
        }
    }
}

/// Configuration for the tracker daemon, read once at startup
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Asset ticker symbol
    pub asset: String,
    /// Fiat currency code
    pub fiat: String,
    /// Seconds between polling cycles
    pub poll_interval_secs: u64,
    /// Sink selection
    pub sink: SinkKind,
    /// Database URL, required for the table sink
    pub database_url: Option<String>,
    /// Database connection pool size
    pub db_pool_size: u32,
    /// Output path for the file sink
    pub csv_path: PathBuf,
    /// Run mode
    pub run_mode: RunMode,
    /// Failure mode
    pub failure_mode: FailureMode,
    /// Optional outbound proxy URL
    pub proxy_url: Option<String>,
    /// HTTP request timeout in seconds
    pub http_timeout_secs: u64,
    /// Identifying user-agent header override
    pub user_agent: Option<String>,
    /// Accept invalid TLS certificates; needed with some proxies
    pub accept_invalid_certs: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            asset: env::var("P2P_ASSET").unwrap_or_else(|_| "USDT".to_string()),
            fiat: env::var("P2P_FIAT").unwrap_or_else(|_| "ETB".to_string()),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
            sink: env::var("SINK")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(SinkKind::Table),
            database_url: env::var("DATABASE_URL").ok(),
            db_pool_size: env::var("DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            csv_path: env::var("CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("p2p_listings.csv")),
            run_mode: env::var("RUN_MODE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(RunMode::Loop),
            failure_mode: env::var("FAILURE_MODE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(FailureMode::Lenient),
            proxy_url: env::var("PROXY_URL").ok(),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            user_agent: env::var("HTTP_USER_AGENT").ok(),
            accept_invalid_certs: env::var("ACCEPT_INVALID_CERTS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

impl TrackerConfig {
    /// Create a new configuration using environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Feed client configuration derived from this config
    pub fn feed_config(&self) -> FeedConfig {
        let mut feed = FeedConfig {
            timeout_secs: self.http_timeout_secs,
            proxy: self.proxy_url.clone(),
            accept_invalid_certs: self.accept_invalid_certs,
            ..FeedConfig::default()
        };
        if let Some(user_agent) = &self.user_agent {
            feed.user_agent = user_agent.clone();
        }
        feed
    }

    /// Sink specification derived from this config
    ///
    /// Selecting the table sink without a database URL is a configuration
    /// error, fatal at startup.
    pub fn sink_spec(&self) -> Result<SinkSpec> {
        match self.sink {
            SinkKind::Table => {
                let database_url = self.database_url.clone().ok_or_else(|| {
                    Error::ConfigurationError(
                        "DATABASE_URL must be set when the table sink is selected".to_string(),
                    )
                })?;
                Ok(SinkSpec::Table {
                    database_url,
                    pool_size: self.db_pool_size,
                })
            }
            SinkKind::File => Ok(SinkSpec::File {
                path: self.csv_path.clone(),
            }),
        }
    }
}
