//! Data Transfer Objects for the HTTP API.
//!
//! The response table type is re-exported from the cache module since it
//! already serializes as a plain JSON object.

use serde::{Deserialize, Serialize};

pub use crate::cache::CategoryCounts;

fn default_filter() -> String {
    crate::queries::FILTER_ALL.to_string()
}

/// Query parameters for the age-bracket endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeRangeQuery {
    /// `all`, `under30`, `30to60`, or `over60` (default: `all`)
    #[serde(default = "default_filter")]
    pub age_range: String,
}

/// Query parameters for the gender/sex-filtered endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SexRangeQuery {
    /// `all` or an exact gender value / sex code (default: `all`)
    #[serde(default = "default_filter")]
    pub sex_range: String,
}

/// Query parameters for the breast-cancer stage endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRangeQuery {
    /// `all` or an exact tumor stage category (default: `all`)
    #[serde(default = "default_filter")]
    pub stage_range: String,
}

/// Connectivity check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Human-readable status message
    pub message: String,
}
