use std::sync::Arc;

use formgen_pipeline::DocumentGenerator;
use formgen_storage::BlobStorage;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: formgen_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Blob storage for template sources and generated artifacts.
    pub storage: Arc<dyn BlobStorage>,
    /// Document generator (synchronous generation path).
    pub generator: Arc<DocumentGenerator>,
    /// Centralized event bus for publishing platform events.
    pub event_bus: Arc<formgen_events::EventBus>,
}
