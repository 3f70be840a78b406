//! Route definitions for the persisted event log.

use axum::routing::get;
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Event log routes, nested under `/events`.
///
/// ```text
/// GET    /    list_events
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(events::list_events))
}
