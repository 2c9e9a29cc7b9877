//! Normalizer: flatten raw listing entries into persistable records
//!
//! This is the only non-trivial logic in the pipeline and it is kept pure;
//! no I/O happens here.

use chrono::{DateTime, Timelike, Utc};
use common::model::{Record, TradeSide};
use serde_json::Value;
use tracing::debug;

use crate::models::AdvEntry;

/// Capture instant for one flatten pass, truncated to whole seconds
pub fn capture_instant() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Flatten both sides' listing entries into records
///
/// Buy-side records come first, then sell-side, each in listing order.
/// `captured_at` is stamped identically on every produced record. An entry
/// missing its `adv` or `advertiser` sub-object is dropped; its siblings
/// are still processed.
pub fn flatten(buy: &[Value], sell: &[Value], captured_at: DateTime<Utc>) -> Vec<Record> {
    let mut records = Vec::with_capacity(buy.len() + sell.len());

    let mut skipped = flatten_side(buy, TradeSide::Buy, captured_at, &mut records);
    skipped += flatten_side(sell, TradeSide::Sell, captured_at, &mut records);

    if skipped > 0 {
        debug!("Dropped {} malformed listing entries", skipped);
    }

    records
}

fn flatten_side(
    entries: &[Value],
    side: TradeSide,
    captured_at: DateTime<Utc>,
    records: &mut Vec<Record>,
) -> usize {
    let mut skipped = 0;

    for entry in entries {
        match serde_json::from_value::<AdvEntry>(entry.clone()) {
            Ok(listing) => records.push(Record::new(
                captured_at,
                listing.adv.price,
                listing.adv.surplus_amount,
                listing.adv.fiat_unit,
                listing.advertiser.nick_name,
                listing.advertiser.month_order_count,
                listing.advertiser.month_finish_rate,
                side,
            )),
            Err(_) => skipped += 1,
        }
    }

    skipped
}
