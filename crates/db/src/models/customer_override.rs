//! Customer override model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use formgen_core::types::{DbId, Timestamp};

/// A row from the `customer_overrides` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CustomerOverride {
    pub id: DbId,
    pub public_id: String,
    pub service_id: DbId,
    pub kind: String,
    pub payload: serde_json::Value,
    pub status: String,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for a customer-submitted override. Always lands as `pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOverride {
    pub kind: String,
    pub payload: serde_json::Value,
}
