//! Route definitions for override review decisions.
//!
//! Submission and listing live under `/services/{id}/overrides`; the
//! review actions here address an override directly.

use axum::routing::post;
use axum::Router;

use crate::handlers::overrides;
use crate::state::AppState;

/// Override review routes, nested under `/overrides`.
///
/// ```text
/// POST   /{override_id}/approve     approve_override
/// POST   /{override_id}/reject      reject_override
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{override_id}/approve", post(overrides::approve_override))
        .route("/{override_id}/reject", post(overrides::reject_override))
}
