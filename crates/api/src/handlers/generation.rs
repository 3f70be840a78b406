//! Handler for synchronous document generation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use formgen_core::error::CoreError;
use formgen_pipeline::GenerateRequest;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for POST /generate.
#[derive(Debug, Deserialize)]
pub struct GenerateDocumentRequest {
    /// Public ID of the template to fill.
    pub template_id: String,
    /// Explicit client data; mutually optional with `service_id`, but
    /// at least one must supply values.
    pub client_data: Option<HashMap<String, String>>,
    /// Service context: supplies latest intake data and approved
    /// overrides.
    pub service_id: Option<String>,
}

/// Response for a successful generation run.
#[derive(Debug, Serialize)]
pub struct GenerateDocumentResponse {
    pub artifact_id: String,
    pub file_name: String,
    pub file_url: String,
    /// Declared placeholders with no client value. The document was
    /// still produced, with placeholder text in those positions.
    pub unmatched_fields: Vec<String>,
}

/// POST /api/v1/generate
///
/// Fill a template with client data and store the result as a new
/// artifact. Generation runs synchronously; the response carries the
/// download URL.
pub async fn generate_document(
    State(state): State<AppState>,
    Json(input): Json<GenerateDocumentRequest>,
) -> AppResult<impl IntoResponse> {
    if input.client_data.is_none() && input.service_id.is_none() {
        return Err(CoreError::Validation(
            "either client_data or service_id must be provided".into(),
        )
        .into());
    }

    let outcome = state
        .generator
        .generate(GenerateRequest {
            template_id: input.template_id,
            client_data: input.client_data,
            service_id: input.service_id,
        })
        .await?;

    if !outcome.unmatched_fields.is_empty() {
        tracing::warn!(
            artifact_id = %outcome.artifact.public_id,
            unmatched = ?outcome.unmatched_fields,
            "Generated document has unmatched fields"
        );
    }

    let response = GenerateDocumentResponse {
        artifact_id: outcome.artifact.public_id.clone(),
        file_name: outcome.artifact.file_name.clone(),
        file_url: state.config.artifact_url(&outcome.artifact.public_id),
        unmatched_fields: outcome.unmatched_fields,
    };

    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}
