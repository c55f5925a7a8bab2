//! In-memory scripted warehouse for unit testing and local development.
//!
//! Responses are queued ahead of time with [`LocalWarehouse::push_rows`] and
//! [`LocalWarehouse::push_error`]; each `execute` call consumes one. With an
//! empty queue the warehouse answers every query with an empty row set, which
//! keeps the server usable in local development without a real backend.
//!
//! Every call is recorded, so tests can assert how many times (and with which
//! SQL and parameters) the warehouse was actually hit.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::client::{Row, Warehouse};
use super::error::{WarehouseError, WarehouseResult};

/// One recorded `execute` invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub sql: String,
    pub params: Vec<String>,
}

/// Scripted in-memory warehouse.
#[derive(Default)]
pub struct LocalWarehouse {
    responses: Mutex<VecDeque<WarehouseResult<Vec<Row>>>>,
    calls: Mutex<Vec<RecordedCall>>,
    ping_error: Mutex<Option<WarehouseError>>,
}

impl LocalWarehouse {
    /// Create an empty warehouse: queries return no rows, pings succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response for the next unscripted `execute` call.
    pub fn push_rows(&self, rows: Vec<Row>) {
        self.responses.lock().push_back(Ok(rows));
    }

    /// Queue a failure for the next unscripted `execute` call.
    pub fn push_error(&self, err: WarehouseError) {
        self.responses.lock().push_back(Err(err));
    }

    /// Make the next `ping` fail with the given error.
    pub fn fail_ping(&self, err: WarehouseError) {
        *self.ping_error.lock() = Some(err);
    }

    /// Number of `execute` calls observed so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// All `execute` calls observed so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Warehouse for LocalWarehouse {
    async fn execute(&self, sql: &str, params: &[String]) -> WarehouseResult<Vec<Row>> {
        self.calls.lock().push(RecordedCall {
            sql: sql.to_string(),
            params: params.to_vec(),
        });

        match self.responses.lock().pop_front() {
            Some(response) => response,
            None => Ok(Vec::new()),
        }
    }

    async fn ping(&self) -> WarehouseResult<()> {
        match self.ping_error.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
