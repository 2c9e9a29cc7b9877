//! One fetch-flatten-append cycle

use std::sync::Arc;

use common::error::{FetchError, Result};
use common::model::TradeSide;
use market_feed::client::FeedClient;
use market_feed::flatten::{capture_instant, flatten};
use market_feed::models::ListingQuery;
use recorder::RecordSink;
use serde_json::Value;
use tracing::warn;

use crate::config::{FailureMode, TrackerConfig};

/// Outcome of one completed cycle
#[derive(Debug, Clone, Copy)]
pub struct CycleReport {
    pub buy_listings: usize,
    pub sell_listings: usize,
    pub records_appended: usize,
}

/// The ingest-normalize-persist pipeline, executed once per cycle
pub struct Pipeline {
    feed: FeedClient,
    sink: Arc<dyn RecordSink>,
    asset: String,
    fiat: String,
    failure_mode: FailureMode,
}

impl Pipeline {
    pub fn new(feed: FeedClient, sink: Arc<dyn RecordSink>, config: &TrackerConfig) -> Self {
        Self {
            feed,
            sink,
            asset: config.asset.clone(),
            fiat: config.fiat.clone(),
            failure_mode: config.failure_mode,
        }
    }

    /// Run one full cycle: fetch both sides sequentially, flatten, append
    ///
    /// In strict mode the first fetch failure aborts the cycle before any
    /// sink write; the sell side is not fetched if the buy side failed.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let buy_query = ListingQuery::new(&self.asset, &self.fiat, TradeSide::Buy);
        let buy = resolve_side(
            self.feed.fetch(&buy_query).await,
            TradeSide::Buy,
            self.failure_mode,
        )?;

        let sell_query = ListingQuery::new(&self.asset, &self.fiat, TradeSide::Sell);
        let sell = resolve_side(
            self.feed.fetch(&sell_query).await,
            TradeSide::Sell,
            self.failure_mode,
        )?;

        let captured_at = capture_instant();
        let records = flatten(&buy, &sell, captured_at);
        self.sink.append(&records).await?;

        Ok(CycleReport {
            buy_listings: buy.len(),
            sell_listings: sell.len(),
            records_appended: records.len(),
        })
    }
}

/// Apply the configured failure mode to one side's fetch result
///
/// Strict mode propagates the classified failure; lenient mode degrades
/// that side to an empty result so the cycle can continue with partial
/// data.
fn resolve_side(
    result: std::result::Result<Vec<Value>, FetchError>,
    side: TradeSide,
    mode: FailureMode,
) -> Result<Vec<Value>> {
    match result {
        Ok(entries) => Ok(entries),
        Err(err) => match mode {
            FailureMode::Strict => Err(err.into()),
            FailureMode::Lenient => {
                warn!("{} side fetch failed, continuing with an empty side: {}", side, err);
                Ok(Vec::new())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::Error;
    use serde_json::json;

    #[test]
    fn test_resolve_side_passes_listings_through() {
        let entries = vec![json!({"adv": {}})];

        let strict = resolve_side(Ok(entries.clone()), TradeSide::Buy, FailureMode::Strict);
        assert_eq!(strict.unwrap().len(), 1);

        let lenient = resolve_side(Ok(entries), TradeSide::Buy, FailureMode::Lenient);
        assert_eq!(lenient.unwrap().len(), 1);
    }

    #[test]
    fn test_strict_mode_propagates_fetch_failure() {
        let result = resolve_side(
            Err(FetchError::Http(503)),
            TradeSide::Buy,
            FailureMode::Strict,
        );

        assert!(matches!(result, Err(Error::Fetch(FetchError::Http(503)))));
    }

    #[test]
    fn test_lenient_mode_degrades_to_empty() {
        let result = resolve_side(
            Err(FetchError::Http(503)),
            TradeSide::Buy,
            FailureMode::Lenient,
        );

        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_lenient_mode_degrades_connection_errors_too() {
        let result = resolve_side(
            Err(FetchError::Connection("refused".to_string())),
            TradeSide::Sell,
            FailureMode::Lenient,
        );

        assert!(result.unwrap().is_empty());
    }
}
