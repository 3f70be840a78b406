//! Repository for the `document_artifacts` table.
//!
//! Insert-only by design: there is no update method. Regeneration
//! inserts a new row and prior artifacts stay retrievable unchanged.

use sqlx::PgPool;

use formgen_core::types::DbId;

use crate::models::artifact::{CreateArtifact, DocumentArtifact};

const COLUMNS: &str = "id, public_id, template_id, service_id, status, storage_path, \
     file_name, unmatched_fields, error_message, generated_at";

/// Provides artifact history operations.
pub struct ArtifactRepo;

impl ArtifactRepo {
    /// Insert a new artifact row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateArtifact,
    ) -> Result<DocumentArtifact, sqlx::Error> {
        let unmatched = serde_json::json!(input.unmatched_fields);
        let query = format!(
            "INSERT INTO document_artifacts \
                (public_id, template_id, service_id, status, storage_path, file_name, \
                 unmatched_fields, error_message) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DocumentArtifact>(&query)
            .bind(&input.public_id)
            .bind(input.template_id)
            .bind(input.service_id)
            .bind(&input.status)
            .bind(&input.storage_path)
            .bind(&input.file_name)
            .bind(&unmatched)
            .bind(&input.error_message)
            .fetch_one(pool)
            .await
    }

    /// Find an artifact by public ID.
    pub async fn find_by_public_id(
        pool: &PgPool,
        public_id: &str,
    ) -> Result<Option<DocumentArtifact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM document_artifacts WHERE public_id = $1");
        sqlx::query_as::<_, DocumentArtifact>(&query)
            .bind(public_id)
            .fetch_optional(pool)
            .await
    }

    /// A template's generation history, newest first.
    pub async fn list_for_template(
        pool: &PgPool,
        template_id: DbId,
    ) -> Result<Vec<DocumentArtifact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_artifacts \
             WHERE template_id = $1 \
             ORDER BY generated_at DESC, id DESC"
        );
        sqlx::query_as::<_, DocumentArtifact>(&query)
            .bind(template_id)
            .fetch_all(pool)
            .await
    }

    /// A service's generation history, newest first.
    pub async fn list_for_service(
        pool: &PgPool,
        service_id: DbId,
    ) -> Result<Vec<DocumentArtifact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_artifacts \
             WHERE service_id = $1 \
             ORDER BY generated_at DESC, id DESC"
        );
        sqlx::query_as::<_, DocumentArtifact>(&query)
            .bind(service_id)
            .fetch_all(pool)
            .await
    }
}
