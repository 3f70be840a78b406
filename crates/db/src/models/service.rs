//! Service model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use formgen_core::types::{DbId, Timestamp};

/// A row from the `services` table: one or more templates bundled for
/// a specific client.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Service {
    pub id: DbId,
    pub public_id: String,
    pub name: String,
    pub owner_ref: String,
    pub client_email: String,
    pub template_ids: serde_json::Value,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Service {
    /// Decode the stored template public-id list.
    pub fn template_public_ids(&self) -> Result<Vec<String>, serde_json::Error> {
        serde_json::from_value(self.template_ids.clone())
    }
}

/// DTO for creating a new service.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateService {
    pub name: String,
    pub owner_ref: String,
    pub client_email: String,
    pub template_ids: Vec<String>,
}
