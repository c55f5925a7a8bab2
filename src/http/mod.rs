//! HTTP server module for the analytics gateway.
//!
//! This module provides an axum-based HTTP server exposing the five analytic
//! endpoints plus the connectivity check. It reuses the service layer, the
//! warehouse trait, and the result cache from the core library.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Filter parsing (query string, default "all")           │
//! │  - Cache lookup / population                              │
//! │  - JSON serialization, CORS, compression, error mapping   │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/analytics.rs)                    │
//! │  - Query building and result shaping                      │
//! └───────────────────┬──────────────────────────────────────┘
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Warehouse Layer (warehouse/)                             │
//! │  - RedshiftWarehouse / LocalWarehouse                     │
//! └──────────────────────────────────────────────────────────┘
//! ```

#[cfg(feature = "http-server")]
pub mod dto;

#[cfg(feature = "http-server")]
pub mod error;

#[cfg(feature = "http-server")]
pub mod handlers;

#[cfg(feature = "http-server")]
pub mod router;

#[cfg(feature = "http-server")]
pub mod state;

#[cfg(feature = "http-server")]
pub use router::create_router;

#[cfg(feature = "http-server")]
pub use state::AppState;
