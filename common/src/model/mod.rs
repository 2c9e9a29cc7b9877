//! Domain model for captured marketplace listings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Trade side of a listing (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// The wire and sink representation of the side
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TradeSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(TradeSide::Buy),
            "SELL" => Ok(TradeSide::Sell),
            other => Err(Error::ConfigurationError(format!(
                "Unknown trade side: {}",
                other
            ))),
        }
    }
}

/// One flattened marketplace listing, the unit persisted by the sinks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Capture instant, identical for every record of one cycle
    pub captured_at: DateTime<Utc>,
    /// Listed price, fiat units per unit of asset, preserved as delivered
    pub price: String,
    /// Quantity still available on the advertisement
    pub available_quantity: String,
    /// Fiat currency code of the price
    pub fiat_unit: String,
    /// Advertiser nickname
    pub user: String,
    /// Advertiser order count over the last month
    pub order_count: i64,
    /// Advertiser completion rate, raw value; units are source-dependent
    /// (fraction or percentage) and intentionally not converted
    pub completion_rate: f64,
    /// The side of the query that produced this record
    pub trade_type: TradeSide,
}

impl Record {
    /// Create a new record from flattened listing fields
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        captured_at: DateTime<Utc>,
        price: impl Into<String>,
        available_quantity: impl Into<String>,
        fiat_unit: impl Into<String>,
        user: impl Into<String>,
        order_count: i64,
        completion_rate: f64,
        trade_type: TradeSide,
    ) -> Self {
        Self {
            captured_at,
            price: price.into(),
            available_quantity: available_quantity.into(),
            fiat_unit: fiat_unit.into(),
            user: user.into(),
            order_count,
            completion_rate,
            trade_type,
        }
    }
}
