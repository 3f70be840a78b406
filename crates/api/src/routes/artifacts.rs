//! Route definitions for artifact retrieval and download.

use axum::routing::get;
use axum::Router;

use crate::handlers::artifacts;
use crate::state::AppState;

/// Artifact routes, nested under `/artifacts`.
///
/// ```text
/// GET    /{artifact_id}             get_artifact
/// GET    /{artifact_id}/download    download_artifact
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{artifact_id}", get(artifacts::get_artifact))
        .route("/{artifact_id}/download", get(artifacts::download_artifact))
}
