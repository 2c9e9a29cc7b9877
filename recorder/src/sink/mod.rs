pub mod csv_file;
pub mod postgres;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use common::db;
use common::error::{Result, SinkError};
use common::model::Record;

/// Durable destination for captured listing records
///
/// Append is the only mutation operation; rows are never updated or
/// deleted. An empty batch is a no-op returning success.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn append(&self, records: &[Record]) -> std::result::Result<(), SinkError>;
}

/// Sink selection resolved from configuration
#[derive(Debug, Clone)]
pub enum SinkSpec {
    /// Append to a relational table behind a connection pool
    Table {
        database_url: String,
        pool_size: u32,
    },
    /// Append to a delimited text file
    File { path: PathBuf },
}

/// Build the configured sink
///
/// The table sink's pool is constructed here, once at startup; a failure
/// to connect is fatal in every run mode.
pub async fn create_sink(spec: &SinkSpec) -> Result<Arc<dyn RecordSink>> {
    match spec {
        SinkSpec::Table {
            database_url,
            pool_size,
        } => {
            let pool = db::connect_pool(database_url, *pool_size).await?;
            Ok(Arc::new(postgres::PostgresSink::new(pool)))
        }
        SinkSpec::File { path } => Ok(Arc::new(csv_file::CsvFileSink::new(path.clone()))),
    }
}
