//! MedStats HTTP Server Binary
//!
//! This is the main entry point for the analytics gateway. It initializes
//! the warehouse backend, sets up the HTTP router, and starts serving
//! requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the in-memory warehouse (default)
//! cargo run --bin medstats-server
//!
//! # Run against Redshift
//! DB_NAME=health DB_USER=analyst DB_PASSWORD=... DB_HOST=... \
//!   cargo run --bin medstats-server --features "redshift-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `DB_NAME`, `DB_USER`, `DB_PASSWORD`, `DB_HOST`, `DB_PORT`: Warehouse
//!   connection settings (required for the redshift-repo feature)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use medstats_rust::http::{create_router, AppState};
use medstats_rust::warehouse;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env before reading any configuration
    dotenvy::dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting MedStats HTTP Server");

    // Build the warehouse backend selected by cargo features
    let warehouse = warehouse::warehouse_from_env().map_err(|e| anyhow::anyhow!(e))?;
    info!("Warehouse backend initialized");

    // Create application state (owns the result cache)
    let state = AppState::new(warehouse);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
