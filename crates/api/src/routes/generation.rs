//! Route definition for document generation.

use axum::routing::post;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Top-level generation route.
///
/// ```text
/// POST   /generate                  generate_document
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(generation::generate_document))
}
