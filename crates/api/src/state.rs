use std::sync::Arc;

use crate::cache::ListingCache;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: langmap_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Cached listing views, invalidated by imports.
    pub cache: Arc<ListingCache>,
}
