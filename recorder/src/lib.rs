//! Durable sinks for captured listing records

pub mod sink;

pub use sink::csv_file::CsvFileSink;
pub use sink::postgres::PostgresSink;
pub use sink::{create_sink, RecordSink, SinkSpec};
