//! # MedStats Rust Backend
//!
//! Read-only analytics gateway over a columnar health-data warehouse.
//!
//! The gateway accepts HTTP requests carrying a filter token, translates each
//! into a parameterized aggregation query against Redshift, and returns a
//! JSON frequency table. Computed tables are cached per (dataset, filter) for
//! the lifetime of the process, and concurrent misses for the same key
//! coalesce into a single warehouse call.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`queries`]: Aggregation query builders, one per analytic dataset
//! - [`cache`]: Per-process result cache with single-flight population
//! - [`services`]: Query execution and row shaping
//! - [`warehouse`]: Warehouse trait and the Redshift / in-memory backends
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod cache;
pub mod queries;
pub mod services;
pub mod warehouse;

#[cfg(feature = "http-server")]
pub mod http;
