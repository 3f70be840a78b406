pub mod artifacts;
pub mod events;
pub mod generation;
pub mod health;
pub mod overrides;
pub mod services;
pub mod templates;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /templates                               register (POST), list (GET)
/// /templates/{id}                          get, metadata edit (PATCH)
/// /templates/{id}/reparse                  explicit re-parse (POST)
/// /templates/{id}/lock                     acquire (POST), release (DELETE)
/// /templates/{id}/artifacts                generation history
///
/// /uploads/{token}                         raw file bytes (PUT)
///
/// /services                                create (POST), list (GET)
/// /services/{id}                           get, status edit (PATCH)
/// /services/{id}/send-intake               mark intake delivered (POST)
/// /services/{id}/intake                    client submission (POST)
/// /services/{id}/overrides                 submit (POST), list (GET)
/// /services/{id}/artifacts                 generation history
///
/// /overrides/{id}/approve                  review decision (POST)
/// /overrides/{id}/reject                   review decision (POST)
///
/// /generate                                fill a template (POST)
/// /artifacts/{id}                          get
/// /artifacts/{id}/download                 binary bytes
///
/// /events                                  recent persisted events (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/templates", templates::router())
        .nest("/uploads", uploads::router())
        .nest("/services", services::router())
        .nest("/overrides", overrides::router())
        .merge(generation::router())
        .nest("/artifacts", artifacts::router())
        .nest("/events", events::router())
}
