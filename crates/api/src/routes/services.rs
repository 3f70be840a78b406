//! Route definitions for service and intake endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{artifacts, overrides, services};
use crate::state::AppState;

/// Service routes, nested under `/services`.
///
/// ```text
/// POST   /                          create_service
/// GET    /                          list_services
/// GET    /{service_id}              get_service
/// PATCH  /{service_id}              update_service_status
/// POST   /{service_id}/send-intake  send_intake
/// POST   /{service_id}/intake       submit_intake
/// POST   /{service_id}/overrides    submit_override
/// GET    /{service_id}/overrides    list_overrides
/// GET    /{service_id}/artifacts    list_for_service
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(services::list_services).post(services::create_service),
        )
        .route(
            "/{service_id}",
            get(services::get_service).patch(services::update_service_status),
        )
        .route("/{service_id}/send-intake", post(services::send_intake))
        .route("/{service_id}/intake", post(services::submit_intake))
        .route(
            "/{service_id}/overrides",
            get(overrides::list_overrides).post(overrides::submit_override),
        )
        .route("/{service_id}/artifacts", get(artifacts::list_for_service))
}
