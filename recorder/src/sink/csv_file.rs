//! File sink appending delimited rows to a CSV file

use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use common::error::SinkError;
use common::model::Record;

use super::RecordSink;

/// Column list shared with the table sink; order matters
pub const CSV_HEADER: [&str; 8] = [
    "Timestamp",
    "Price",
    "Available Quantity",
    "Fiat",
    "User",
    "Order Count",
    "Completion Rate (%)",
    "Trade Type",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sink appending records to a delimited text file
///
/// The header row is written iff the current append is the file's first
/// non-empty write (the file is missing or zero-length at that moment).
/// An empty batch performs no I/O and never creates the file.
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    /// Create a new sink writing to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSink for CsvFileSink {
    async fn append(&self, records: &[Record]) -> Result<(), SinkError> {
        if records.is_empty() {
            return Ok(());
        }

        let needs_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(write_error(e)),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_error)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(CSV_HEADER).map_err(write_error)?;
        }

        for record in records {
            writer
                .write_record(&[
                    record.captured_at.format(TIMESTAMP_FORMAT).to_string(),
                    record.price.clone(),
                    record.available_quantity.clone(),
                    record.fiat_unit.clone(),
                    record.user.clone(),
                    record.order_count.to_string(),
                    record.completion_rate.to_string(),
                    record.trade_type.as_str().to_string(),
                ])
                .map_err(write_error)?;
        }

        writer.flush().map_err(write_error)?;
        debug!("Appended {} records to {}", records.len(), self.path.display());

        Ok(())
    }
}

fn write_error(err: impl Display) -> SinkError {
    SinkError::Write(err.to_string())
}
