//! HTTP error handling and response types.
//!
//! Two failure shapes are externally visible and both are contractual:
//! connectivity failures return a structured JSON body with a fixed message,
//! while query execution failures pass the raw backend message through as
//! plain text. Both are HTTP 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::warehouse::WarehouseError;

/// Fixed body for every connectivity failure.
pub const CONNECTION_FAILED: &str = "Connection to Redshift failed.";

/// Structured error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message
    pub error: String,
}

impl ErrorBody {
    pub fn connection_failed() -> Self {
        Self {
            error: CONNECTION_FAILED.to_string(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Any warehouse-layer failure
    Warehouse(WarehouseError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Warehouse(WarehouseError::Query { message }) => {
                // Raw backend message, passed through verbatim as plain text.
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
            AppError::Warehouse(err) => {
                tracing::warn!(error = %err, "warehouse unreachable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::connection_failed()),
                )
                    .into_response()
            }
        }
    }
}

impl From<WarehouseError> for AppError {
    fn from(err: WarehouseError) -> Self {
        AppError::Warehouse(err)
    }
}
