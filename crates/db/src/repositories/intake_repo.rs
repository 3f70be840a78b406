//! Repository for the `intakes` table.

use sqlx::PgPool;

use formgen_core::types::DbId;

use crate::models::intake::Intake;

const COLUMNS: &str = "id, service_id, data, submitted_at";

/// Provides intake submission storage.
pub struct IntakeRepo;

impl IntakeRepo {
    /// Record a client submission for a service.
    pub async fn create(
        pool: &PgPool,
        service_id: DbId,
        data: &serde_json::Value,
    ) -> Result<Intake, sqlx::Error> {
        let query = format!(
            "INSERT INTO intakes (service_id, data) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Intake>(&query)
            .bind(service_id)
            .bind(data)
            .fetch_one(pool)
            .await
    }

    /// The most recent submission for a service, if any.
    pub async fn latest_for_service(
        pool: &PgPool,
        service_id: DbId,
    ) -> Result<Option<Intake>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM intakes \
             WHERE service_id = $1 \
             ORDER BY submitted_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Intake>(&query)
            .bind(service_id)
            .fetch_optional(pool)
            .await
    }
}
