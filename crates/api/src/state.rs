use std::sync::Arc;

use sitescore_db::store::UserStore;

use crate::config::ServerConfig;
use crate::middleware::free_access::FreeAccessTracker;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Credential store (PostgreSQL or in-memory).
    pub store: Arc<dyn UserStore>,
    /// Server configuration (JWT settings, client address policy).
    pub config: Arc<ServerConfig>,
    /// Client addresses that have spent their free evaluation.
    pub free_access: Arc<FreeAccessTracker>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            free_access: Arc::new(FreeAccessTracker::new()),
        }
    }
}
