//! Repository for the `services` table.

use sqlx::PgPool;

use formgen_core::types::DbId;

use crate::models::service::{CreateService, Service};

const COLUMNS: &str =
    "id, public_id, name, owner_ref, client_email, template_ids, status, created_at, updated_at";

/// Provides CRUD operations for services.
pub struct ServiceRepo;

impl ServiceRepo {
    /// Insert a new service in `draft` status.
    pub async fn create(
        pool: &PgPool,
        public_id: &str,
        input: &CreateService,
    ) -> Result<Service, sqlx::Error> {
        let template_ids = serde_json::json!(input.template_ids);
        let query = format!(
            "INSERT INTO services (public_id, name, owner_ref, client_email, template_ids) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(public_id)
            .bind(&input.name)
            .bind(&input.owner_ref)
            .bind(&input.client_email)
            .bind(&template_ids)
            .fetch_one(pool)
            .await
    }

    /// Find a service by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE id = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a service by public ID.
    pub async fn find_by_public_id(
        pool: &PgPool,
        public_id: &str,
    ) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE public_id = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(public_id)
            .fetch_optional(pool)
            .await
    }

    /// List all services, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services ORDER BY created_at DESC");
        sqlx::query_as::<_, Service>(&query).fetch_all(pool).await
    }

    /// Move a service to a new lifecycle status.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Service>, sqlx::Error> {
        let query = format!(
            "UPDATE services SET status = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
