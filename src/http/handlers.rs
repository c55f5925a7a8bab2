//! HTTP handlers for the analytics endpoints.
//!
//! Every analytic handler follows the same shape: parse the filter token
//! (defaulting to `all`), consult the result cache, and on a miss delegate to
//! the service layer. Concurrent misses for the same key coalesce inside the
//! cache, so each (dataset, filter) pair hits the warehouse at most once per
//! process lifetime.

use axum::extract::{Query, State};
use axum::Json;
use tracing::info;

use super::dto::{AgeRangeQuery, CategoryCounts, SexRangeQuery, StageRangeQuery, StatusResponse};
use super::error::AppError;
use super::state::AppState;
use crate::queries::Dataset;
use crate::services::analytics;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Fetch the table for `(dataset, filter)`, via the cache.
async fn cached_table(
    state: &AppState,
    dataset: Dataset,
    filter: String,
) -> Result<CategoryCounts, AppError> {
    let warehouse = state.warehouse.clone();
    let token = filter.clone();
    let table = state
        .cache
        .get_or_compute(dataset, &filter, move || async move {
            analytics::compute(dataset, warehouse.as_ref(), &token).await
        })
        .await?;
    Ok(table)
}

// =============================================================================
// Connectivity Check
// =============================================================================

/// GET /
///
/// Probe the warehouse connection without running any aggregation.
pub async fn index(State(state): State<AppState>) -> HandlerResult<StatusResponse> {
    info!("Attempting to connect to Redshift");
    state.warehouse.ping().await.map_err(AppError::from)?;
    info!("Connection to Redshift successful");

    Ok(Json(StatusResponse {
        message: "Connection to Redshift successful.".to_string(),
    }))
}

// =============================================================================
// Analytic Endpoints
// =============================================================================

/// GET /diabetes/age?age_range=all|under30|30to60|over60
pub async fn diabetes_age(
    State(state): State<AppState>,
    Query(query): Query<AgeRangeQuery>,
) -> HandlerResult<CategoryCounts> {
    let table = cached_table(&state, Dataset::DiabetesAge, query.age_range).await?;
    Ok(Json(table))
}

/// GET /diabetes/bmi?sex_range=all|<gender>
pub async fn diabetes_bmi(
    State(state): State<AppState>,
    Query(query): Query<SexRangeQuery>,
) -> HandlerResult<CategoryCounts> {
    let table = cached_table(&state, Dataset::DiabetesBmi, query.sex_range).await?;
    Ok(Json(table))
}

/// GET /heart/gender?age_range=all|under30|30to60|over60
pub async fn heart_gender(
    State(state): State<AppState>,
    Query(query): Query<AgeRangeQuery>,
) -> HandlerResult<CategoryCounts> {
    let table = cached_table(&state, Dataset::HeartGender, query.age_range).await?;
    Ok(Json(table))
}

/// GET /heart/symptoms?sex_range=all|<sex code>
pub async fn heart_symptoms(
    State(state): State<AppState>,
    Query(query): Query<SexRangeQuery>,
) -> HandlerResult<CategoryCounts> {
    let table = cached_table(&state, Dataset::HeartSymptoms, query.sex_range).await?;
    Ok(Json(table))
}

/// GET /breastcancer/stage?stage_range=all|<stage>
pub async fn breast_cancer_stage(
    State(state): State<AppState>,
    Query(query): Query<StageRangeQuery>,
) -> HandlerResult<CategoryCounts> {
    let table = cached_table(&state, Dataset::BreastCancerStage, query.stage_range).await?;
    Ok(Json(table))
}
