//! Table sink backed by PostgreSQL

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use common::error::SinkError;
use common::model::Record;

use super::RecordSink;

const TABLE: &str = "p2p_listings";

/// Sink appending records to a persistent relational table
///
/// The table is created on the first non-empty write; existing rows are
/// never overwritten.
pub struct PostgresSink {
    pool: PgPool,
}

impl PostgresSink {
    /// Create a new sink over an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_table(&self) -> Result<(), SinkError> {
        // "user" is reserved in Postgres, the advertiser column is "username"
        sqlx::query(
            "
            CREATE TABLE IF NOT EXISTS p2p_listings (
                id BIGSERIAL PRIMARY KEY,
                captured_at TIMESTAMPTZ NOT NULL,
                price TEXT NOT NULL,
                available_quantity TEXT NOT NULL,
                fiat_unit TEXT NOT NULL,
                username TEXT NOT NULL,
                order_count BIGINT NOT NULL,
                completion_rate DOUBLE PRECISION NOT NULL,
                trade_type TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(())
    }
}

#[async_trait]
impl RecordSink for PostgresSink {
    async fn append(&self, records: &[Record]) -> Result<(), SinkError> {
        if records.is_empty() {
            return Ok(());
        }

        self.ensure_table().await?;

        for record in records {
            sqlx::query(
                "
                INSERT INTO p2p_listings (
                    captured_at, price, available_quantity, fiat_unit,
                    username, order_count, completion_rate, trade_type
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ",
            )
            .bind(record.captured_at)
            .bind(&record.price)
            .bind(&record.available_quantity)
            .bind(&record.fiat_unit)
            .bind(&record.user)
            .bind(record.order_count)
            .bind(record.completion_rate)
            .bind(record.trade_type.as_str())
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        }

        debug!("Appended {} records to {}", records.len(), TABLE);
        Ok(())
    }
}

/// Classify a driver error into the sink failure taxonomy
fn classify(err: sqlx::Error) -> SinkError {
    use sqlx::Error::*;

    let msg = err.to_string();
    match err {
        Io(_) | Tls(_) | PoolTimedOut | PoolClosed => SinkError::Connectivity(msg),
        ColumnNotFound(_) | ColumnDecode { .. } | TypeNotFound { .. } => SinkError::Schema(msg),
        _ => SinkError::Write(msg),
    }
}
