//! Route definition for the upload landing endpoint.

use axum::routing::put;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// Upload routes, nested under `/uploads`.
///
/// ```text
/// PUT    /{token}                   put_upload
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{token}", put(uploads::put_upload))
}
