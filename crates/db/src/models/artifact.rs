//! Document artifact model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use formgen_core::types::{DbId, Timestamp};

/// Artifact generated successfully.
pub const STATUS_GENERATED: &str = "generated";

/// Generation failed; `error_message` holds the cause.
pub const STATUS_FAILED: &str = "failed";

/// A row from the `document_artifacts` table. Rows are insert-only:
/// regeneration creates a new artifact, preserving delivery history.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentArtifact {
    pub id: DbId,
    pub public_id: String,
    pub template_id: DbId,
    pub service_id: Option<DbId>,
    pub status: String,
    pub storage_path: Option<String>,
    pub file_name: String,
    pub unmatched_fields: serde_json::Value,
    pub error_message: Option<String>,
    pub generated_at: Timestamp,
}

/// Insert DTO for a new artifact row.
#[derive(Debug, Clone)]
pub struct CreateArtifact {
    pub public_id: String,
    pub template_id: DbId,
    pub service_id: Option<DbId>,
    pub status: String,
    pub storage_path: Option<String>,
    pub file_name: String,
    pub unmatched_fields: Vec<String>,
    pub error_message: Option<String>,
}
