//! Wire types for the marketplace listing-search API

use common::model::TradeSide;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page requested from the endpoint; only the first page is ever fetched
pub const PAGE: u32 = 1;

/// Listings requested per page
pub const ROWS_PER_PAGE: u32 = 10;

/// Parameters of one listing search, constructed per fetch call
#[derive(Debug, Clone)]
pub struct ListingQuery {
    /// Asset ticker symbol (e.g., "USDT")
    pub asset: String,
    /// Fiat currency code (e.g., "ETB")
    pub fiat: String,
    /// Trade side to search
    pub side: TradeSide,
    /// Page number
    pub page: u32,
    /// Rows per page
    pub rows: u32,
}

impl ListingQuery {
    /// Create a query for the first page of one side's listings
    pub fn new(asset: &str, fiat: &str, side: TradeSide) -> Self {
        Self {
            asset: asset.to_string(),
            fiat: fiat.to_string(),
            side,
            page: PAGE,
            rows: ROWS_PER_PAGE,
        }
    }
}

/// Request body in the exact schema the remote API expects
///
/// Field names and casing are a fixed external contract.
#[derive(Debug, Serialize)]
pub struct SearchRequest {
    pub asset: String,
    pub fiat: String,
    pub page: u32,
    pub rows: u32,
    #[serde(rename = "tradeType")]
    pub trade_type: TradeSide,
}

impl From<&ListingQuery> for SearchRequest {
    fn from(query: &ListingQuery) -> Self {
        Self {
            asset: query.asset.clone(),
            fiat: query.fiat.clone(),
            page: query.page,
            rows: query.rows,
            trade_type: query.side,
        }
    }
}

/// Top-level search response; `data` may be missing or null
///
/// Entries stay raw JSON here so one malformed entry cannot fail the whole
/// fetch; entry-level decoding happens in the normalizer.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Option<Vec<Value>>,
}

/// One well-formed listing entry; both sub-objects are required
#[derive(Debug, Deserialize)]
pub struct AdvEntry {
    pub adv: Adv,
    pub advertiser: Advertiser,
}

/// Advertisement details
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adv {
    pub price: String,
    pub surplus_amount: String,
    pub fiat_unit: String,
}

/// Advertiser metadata
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertiser {
    pub nick_name: String,
    pub month_order_count: i64,
    pub month_finish_rate: f64,
}
