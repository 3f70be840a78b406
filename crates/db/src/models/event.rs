//! Persisted platform event model.

use serde::Serialize;
use sqlx::FromRow;

use formgen_core::types::{DbId, Timestamp};

/// A row from the `events` table, written by the event persistence
/// service for every bus event.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub event_type: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
