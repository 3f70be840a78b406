//! Intake submission model.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::FromRow;

use formgen_core::types::{DbId, Timestamp};

/// A row from the `intakes` table: one client submission of the flat
/// field-name → value map. Key casing is whatever the intake form
/// collected; generation matches tolerantly.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Intake {
    pub id: DbId,
    pub service_id: DbId,
    pub data: serde_json::Value,
    pub submitted_at: Timestamp,
}

impl Intake {
    /// Decode the stored data map.
    pub fn data_map(&self) -> Result<HashMap<String, String>, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }
}
