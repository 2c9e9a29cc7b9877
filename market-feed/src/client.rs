//! HTTP client for the marketplace listing-search endpoint

use std::time::Duration;

use common::error::{Error, FetchError, Result};
use serde_json::Value;
use tracing::debug;

use crate::models::{ListingQuery, SearchRequest, SearchResponse};

/// Default search endpoint of the marketplace API
pub const DEFAULT_ENDPOINT: &str = "https://p2p.binance.com/bapi/c2c/v2/friendly/c2c/adv/search";

const DEFAULT_USER_AGENT: &str = "p2p-price-tracker";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the feed client
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Search endpoint URL
    pub endpoint: String,
    /// Identifying user-agent header
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Optional outbound proxy URL
    pub proxy: Option<String>,
    /// Accept invalid TLS certificates; needed with some proxies
    pub accept_invalid_certs: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            proxy: None,
            accept_invalid_certs: false,
        }
    }
}

/// Client for the listing-search endpoint
pub struct FeedClient {
    client: reqwest::Client,
    config: FeedConfig,
}

impl FeedClient {
    /// Build a client from the given configuration
    ///
    /// An invalid proxy URL is a configuration error, fatal at startup.
    pub fn new(config: FeedConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs));

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                Error::ConfigurationError(format!("Invalid proxy URL {}: {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        if config.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| Error::ConfigurationError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Fetch one page of listings for a single trade side
    ///
    /// Exactly one attempt per call; failures are classified at this
    /// boundary and never retried. A 200 response without a `data` array
    /// is an empty result, not an error.
    pub async fn fetch(&self, query: &ListingQuery) -> std::result::Result<Vec<Value>, FetchError> {
        let request = SearchRequest::from(query);
        debug!(
            "Requesting {} {} listings for {}/{}",
            query.side, query.rows, query.asset, query.fiat
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let body: SearchResponse = response.json().await.map_err(classify)?;
        let entries = body.data.unwrap_or_default();
        debug!("{} side returned {} listings", query.side, entries.len());

        Ok(entries)
    }
}

/// Classify a transport error into the fetch failure taxonomy
fn classify(err: reqwest::Error) -> FetchError {
    let msg = err.to_string();
    if err.is_timeout() {
        FetchError::Timeout(msg)
    } else if err.is_connect() {
        FetchError::Connection(msg)
    } else if err.is_decode() {
        FetchError::Protocol(msg)
    } else {
        FetchError::Other(msg)
    }
}
