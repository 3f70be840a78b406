//! Template model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use formgen_core::field::FieldDef;
use formgen_core::types::{DbId, Timestamp};

/// A row from the `templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Template {
    pub id: DbId,
    pub public_id: String,
    pub name: String,
    pub original_file_name: String,
    pub file_type: String,
    pub storage_path: Option<String>,
    pub status: String,
    pub extracted_fields: serde_json::Value,
    pub error_message: Option<String>,
    pub version: i32,
    pub content_hash: Option<String>,
    #[serde(skip_serializing)]
    pub upload_token: Option<String>,
    #[serde(skip_serializing)]
    pub upload_token_expires_at: Option<Timestamp>,
    pub locked_by: Option<String>,
    pub locked_at: Option<Timestamp>,
    pub lock_expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Template {
    /// Decode the stored `extracted_fields` JSONB into typed fields.
    pub fn fields(&self) -> Result<Vec<FieldDef>, serde_json::Error> {
        serde_json::from_value(self.extracted_fields.clone())
    }
}

/// DTO for registering a new template upload.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplate {
    pub name: String,
    pub original_file_name: String,
    pub file_type: String,
}

/// DTO for metadata edits. Carries the version stamp the editor read;
/// the repository rejects the update when the stamp no longer matches.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTemplate {
    pub name: Option<String>,
    pub version: i32,
}
