//! Warehouse access layer.
//!
//! The analytics warehouse (Redshift in production) is an external,
//! read-only collaborator. This module defines the call contract used by the
//! service layer and provides two interchangeable backends:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Service Layer (services/analytics.rs)                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Warehouse Trait (client.rs) - Abstract Interface       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────────┐
//!     │  RedshiftWarehouse (sqlx, pool)  │  feature: redshift-repo
//!     │  LocalWarehouse (in-memory)      │  feature: local-repo
//!     └──────────────────────────────────┘
//! ```
//!
//! Queries are always parameterized: the SQL text is assembled from fixed
//! fragments only and user-supplied filter values travel as bound parameters.

// Feature flag priority: redshift > local
// When multiple features are enabled (e.g., --all-features), redshift takes precedence.
#[cfg(not(any(feature = "redshift-repo", feature = "local-repo")))]
compile_error!("Enable at least one warehouse backend feature.");

pub mod client;
pub mod config;
pub mod error;

#[cfg(feature = "local-repo")]
pub mod local;

#[cfg(feature = "redshift-repo")]
pub mod redshift;

pub use client::{Row, Value, Warehouse};
pub use config::RedshiftConfig;
pub use error::{WarehouseError, WarehouseResult};

#[cfg(feature = "local-repo")]
pub use local::LocalWarehouse;

#[cfg(feature = "redshift-repo")]
pub use redshift::RedshiftWarehouse;

use std::sync::Arc;

/// Build the warehouse backend selected by cargo features.
///
/// With `redshift-repo` enabled, reads connection settings from the
/// environment and returns a pooled Redshift client. Otherwise falls back to
/// the in-memory [`LocalWarehouse`], which answers every query with an empty
/// row set and is only useful for local development.
pub fn warehouse_from_env() -> Result<Arc<dyn Warehouse>, String> {
    #[cfg(feature = "redshift-repo")]
    {
        let config = RedshiftConfig::from_env()?;
        let warehouse = RedshiftWarehouse::new(&config).map_err(|e| e.to_string())?;
        Ok(Arc::new(warehouse))
    }

    #[cfg(all(feature = "local-repo", not(feature = "redshift-repo")))]
    {
        tracing::warn!("redshift-repo feature disabled; using in-memory warehouse");
        Ok(Arc::new(LocalWarehouse::new()))
    }
}
