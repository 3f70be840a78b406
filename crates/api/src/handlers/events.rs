//! Handler for the persisted event log.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use formgen_db::repositories::EventRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/events
///
/// The most recent persisted platform events, newest first. Intended
/// for diagnostics; `limit` is clamped to a sane range.
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let events = EventRepo::list_recent(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: events }))
}
