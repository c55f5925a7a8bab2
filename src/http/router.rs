//! Router configuration for the HTTP API.
//!
//! This module sets up all routes and middleware (CORS, compression,
//! tracing) and creates the axum router ready for serving.

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/diabetes/age", get(handlers::diabetes_age))
        .route("/diabetes/bmi", get(handlers::diabetes_bmi))
        .route("/heart/gender", get(handlers::heart_gender))
        .route("/heart/symptoms", get(handlers::heart_symptoms))
        .route("/breastcancer/stage", get(handlers::breast_cancer_stage))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
#[cfg(feature = "local-repo")]
mod tests {
    use super::*;
    use crate::warehouse::LocalWarehouse;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let warehouse = Arc::new(LocalWarehouse::new()) as Arc<dyn crate::warehouse::Warehouse>;
        let state = AppState::new(warehouse);
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
