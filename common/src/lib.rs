//! Common types and utilities for the p2p price tracker
//!
//! This library contains the shared error taxonomy, the domain model for
//! captured listings, and database pool construction used by the other
//! crates in the workspace.

pub mod db;
pub mod error;
pub mod model;

/// Re-export important types
pub use error::{Error, FetchError, Result, SinkError};
