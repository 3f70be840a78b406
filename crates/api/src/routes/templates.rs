//! Route definitions for template lifecycle endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{artifacts, templates};
use crate::state::AppState;

/// Template routes, nested under `/templates`.
///
/// ```text
/// POST   /                          register_template
/// GET    /                          list_templates
/// GET    /{template_id}             get_template
/// PATCH  /{template_id}             update_template
/// POST   /{template_id}/reparse     reparse_template
/// POST   /{template_id}/lock        acquire_lock
/// DELETE /{template_id}/lock        release_lock
/// GET    /{template_id}/artifacts   list_for_template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::list_templates).post(templates::register_template),
        )
        .route(
            "/{template_id}",
            get(templates::get_template).patch(templates::update_template),
        )
        .route("/{template_id}/reparse", post(templates::reparse_template))
        .route(
            "/{template_id}/lock",
            post(templates::acquire_lock).delete(templates::release_lock),
        )
        .route(
            "/{template_id}/artifacts",
            get(artifacts::list_for_template),
        )
}
