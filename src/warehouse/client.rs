//! Warehouse call contract shared by all backends.

use async_trait::async_trait;

use super::error::WarehouseResult;

/// A single typed column value returned by the warehouse.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl Value {
    /// Render the value as a category label for the output table.
    pub fn as_label(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Text(s) => s.clone(),
            Value::Null => "Unknown".to_string(),
        }
    }

    /// Interpret the value as an occurrence count.
    pub fn as_count(&self) -> i64 {
        match self {
            Value::Int(v) => *v,
            Value::Float(v) => *v as i64,
            Value::Text(s) => s.parse().unwrap_or(0),
            Value::Null => 0,
        }
    }

    /// Interpret the value as an integer code (e.g., a sex code), if possible.
    pub fn as_code(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Float(v) => Some(*v as i64),
            Value::Text(s) => s.parse().ok(),
            Value::Null => None,
        }
    }
}

/// One row of typed columns.
pub type Row = Vec<Value>;

/// Abstract interface to the analytics warehouse.
///
/// Backends execute a parameterized SQL text against the store and return
/// rows of typed columns. Parameters bind as text; the SQL casts where an
/// integer comparison is needed.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Execute a parameterized query and return all result rows.
    ///
    /// # Arguments
    /// * `sql` - Query text with `$n` placeholders
    /// * `params` - Bound parameter values, in placeholder order
    ///
    /// # Returns
    /// * `Ok(Vec<Row>)` - All rows produced by the query
    /// * `Err(WarehouseError)` - Connection, execution, or timeout failure
    async fn execute(&self, sql: &str, params: &[String]) -> WarehouseResult<Vec<Row>>;

    /// Probe warehouse connectivity without touching any table.
    async fn ping(&self) -> WarehouseResult<()>;
}
