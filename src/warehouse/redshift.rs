//! Redshift warehouse backend using sqlx.
//!
//! Redshift is wire-compatible with Postgres, so the backend runs on a lazy
//! `sqlx` connection pool. Every query goes through the bound-parameter path;
//! filter values are never interpolated into the SQL text.
//!
//! ## Configuration
//!
//! See [`RedshiftConfig`](super::config::RedshiftConfig) for the environment
//! variables consumed at startup.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Row as _, TypeInfo};
use tracing::debug;

use super::client::{Row, Value, Warehouse};
use super::config::RedshiftConfig;
use super::error::{WarehouseError, WarehouseResult};

/// Pooled Redshift client.
pub struct RedshiftWarehouse {
    pool: PgPool,
    query_timeout: Duration,
}

impl RedshiftWarehouse {
    /// Create a lazily connecting pool from the given configuration.
    ///
    /// No connection is attempted here; the first `execute` or `ping` pays
    /// the connect cost, bounded by the configured acquire timeout.
    pub fn new(config: &RedshiftConfig) -> WarehouseResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_pool_size)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_sec))
            .connect_lazy(&config.database_url())
            .map_err(|e| WarehouseError::configuration(e.to_string()))?;

        Ok(Self {
            pool,
            query_timeout: Duration::from_secs(config.query_timeout_sec),
        })
    }
}

#[async_trait]
impl Warehouse for RedshiftWarehouse {
    async fn execute(&self, sql: &str, params: &[String]) -> WarehouseResult<Vec<Row>> {
        debug!(params = params.len(), "executing warehouse query");

        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(param.as_str());
        }

        let rows = tokio::time::timeout(self.query_timeout, query.fetch_all(&self.pool))
            .await
            .map_err(|_| {
                WarehouseError::timeout(format!(
                    "query exceeded {}s deadline",
                    self.query_timeout.as_secs()
                ))
            })?
            .map_err(map_sqlx_error)?;

        rows.iter().map(decode_row).collect()
    }

    async fn ping(&self) -> WarehouseResult<()> {
        tokio::time::timeout(self.query_timeout, sqlx::query("SELECT 1").execute(&self.pool))
            .await
            .map_err(|_| WarehouseError::timeout("connectivity probe timed out"))?
            .map_err(|e| WarehouseError::connection(e.to_string()))?;
        Ok(())
    }
}

/// Classify sqlx failures into the warehouse error taxonomy.
///
/// Backend-reported errors keep the raw server message so the HTTP layer can
/// pass it through verbatim; everything transport-shaped becomes a
/// connection error.
fn map_sqlx_error(err: sqlx::Error) -> WarehouseError {
    match err {
        sqlx::Error::Database(db) => WarehouseError::query(db.message().to_string()),
        sqlx::Error::PoolTimedOut => WarehouseError::timeout("timed out acquiring a connection"),
        sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Configuration(_) => WarehouseError::connection(err.to_string()),
        other => WarehouseError::query(other.to_string()),
    }
}

/// Decode one wire row into typed column values.
///
/// Column types are matched by the backend's reported type name. Anything
/// not recognizably numeric is read as text, and SQL NULL maps to
/// [`Value::Null`] regardless of column type.
fn decode_row(row: &PgRow) -> WarehouseResult<Row> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let decoded = match column.type_info().name() {
                "INT2" => row
                    .try_get::<Option<i16>, _>(i)
                    .map(|v| v.map(|v| Value::Int(v as i64))),
                "INT4" => row
                    .try_get::<Option<i32>, _>(i)
                    .map(|v| v.map(|v| Value::Int(v as i64))),
                "INT8" => row
                    .try_get::<Option<i64>, _>(i)
                    .map(|v| v.map(Value::Int)),
                "FLOAT4" => row
                    .try_get::<Option<f32>, _>(i)
                    .map(|v| v.map(|v| Value::Float(v as f64))),
                "FLOAT8" => row
                    .try_get::<Option<f64>, _>(i)
                    .map(|v| v.map(Value::Float)),
                _ => row
                    .try_get::<Option<String>, _>(i)
                    .map(|v| v.map(Value::Text)),
            };

            decoded
                .map(|v| v.unwrap_or(Value::Null))
                .map_err(|e| {
                    WarehouseError::query(format!(
                        "failed to decode column {} ({}): {}",
                        i,
                        column.name(),
                        e
                    ))
                })
        })
        .collect()
}
