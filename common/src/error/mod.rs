//! Error types for the p2p price tracker
//!
//! This module provides a unified error handling system for the tracker
//! pipeline. Fetch and sink failures carry their own classification enums
//! so callers can react to the failure kind rather than to raw transport
//! or driver errors.

use thiserror::Error;

/// Classified failure of one listing fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// Remote endpoint answered with a non-success status
    #[error("HTTP error: status {0}")]
    Http(u16),

    /// Could not reach the remote endpoint
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request exceeded the configured timeout
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The response body did not match the expected shape
    #[error("Unexpected response body: {0}")]
    Protocol(String),

    /// Any other transport failure
    #[error("Request failed: {0}")]
    Other(String),
}

/// Classified failure of one sink append
#[derive(Debug, Error)]
pub enum SinkError {
    /// Could not reach or authenticate to the backing store
    #[error("Sink connectivity error: {0}")]
    Connectivity(String),

    /// The sink schema does not match the records being written
    #[error("Sink schema error: {0}")]
    Schema(String),

    /// Writing the records failed
    #[error("Sink write error: {0}")]
    Write(String),
}

/// Tracker error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error, fatal at startup
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A listing fetch failed
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// A sink append failed
    #[error("Sink failed: {0}")]
    Sink(#[from] SinkError),

    /// Database error during pool construction
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
