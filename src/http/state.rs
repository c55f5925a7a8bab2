//! Application state for the HTTP server.

use std::sync::Arc;

use crate::cache::ResultCache;
use crate::warehouse::Warehouse;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Warehouse backend executing the aggregation queries
    pub warehouse: Arc<dyn Warehouse>,
    /// Per-process result cache, one logical table per dataset
    pub cache: Arc<ResultCache>,
}

impl AppState {
    /// Create a new application state with the given warehouse and an empty
    /// cache.
    pub fn new(warehouse: Arc<dyn Warehouse>) -> Self {
        Self {
            warehouse,
            cache: Arc::new(ResultCache::new()),
        }
    }
}
