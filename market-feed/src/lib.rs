//! Marketplace listing feed
//!
//! The fetcher issues one POST per trade side against the marketplace's
//! listing-search endpoint, and the normalizer flattens the returned
//! entries into persistable records.

pub mod client;
pub mod flatten;
pub mod models;

pub use client::{FeedClient, FeedConfig};
pub use flatten::{capture_instant, flatten};
pub use models::ListingQuery;
