//! Repository for the `events` table.

use sqlx::PgPool;

use formgen_core::types::DbId;

use crate::models::event::Event;

const COLUMNS: &str = "id, event_type, entity_type, entity_id, payload, created_at";

/// Provides durable event storage.
pub struct EventRepo;

impl EventRepo {
    /// Insert one event row, returning its ID.
    pub async fn insert(
        pool: &PgPool,
        event_type: &str,
        entity_type: Option<&str>,
        entity_id: Option<&str>,
        payload: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO events (event_type, entity_type, entity_id, payload) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(event_type)
        .bind(entity_type)
        .bind(entity_id)
        .bind(payload)
        .fetch_one(pool)
        .await?;
        Ok(id)
    }

    /// The most recent events, for diagnostics.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events ORDER BY created_at DESC, id DESC LIMIT $1"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
