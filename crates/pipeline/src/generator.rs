//! Document generation: substitution, rendering, artifact history.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use formgen_core::assembly::assemble;
use formgen_core::overrides::{parse_action, OverrideAction};
use formgen_core::{service, CoreError};
use formgen_db::models::artifact::{CreateArtifact, DocumentArtifact, STATUS_FAILED, STATUS_GENERATED};
use formgen_db::models::service::Service;
use formgen_db::models::template::Template;
use formgen_db::repositories::{ArtifactRepo, CustomerOverrideRepo, IntakeRepo, ServiceRepo, TemplateRepo};
use formgen_db::DbPool;
use formgen_events::{bus, EventBus, PlatformEvent};
use formgen_storage::BlobStorage;

use crate::render::render_docx;
use crate::db_err;

/// One generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Public id of the template to fill.
    pub template_id: String,
    /// Explicit client data; when absent the service's latest intake
    /// submission is used.
    pub client_data: Option<HashMap<String, String>>,
    /// Optional service context: supplies intake data and approved
    /// overrides, and receives the artifact in its history.
    pub service_id: Option<String>,
}

/// Result of a successful generation run.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub artifact: DocumentArtifact,
    /// Declared placeholders that had no client value. Non-fatal; the
    /// caller warns the user.
    pub unmatched_fields: Vec<String>,
}

/// Generates filled documents from templates and client data.
///
/// Each run appends a new artifact row; nothing here mutates the
/// source template or prior artifacts, so concurrent runs for
/// different requests are independent.
pub struct DocumentGenerator {
    pool: DbPool,
    storage: Arc<dyn BlobStorage>,
    event_bus: Arc<EventBus>,
}

impl DocumentGenerator {
    pub fn new(pool: DbPool, storage: Arc<dyn BlobStorage>, event_bus: Arc<EventBus>) -> Self {
        Self {
            pool,
            storage,
            event_bus,
        }
    }

    /// Generate one document.
    ///
    /// Missing client values are never fatal (they surface in
    /// `unmatched_fields`); the operation fails on I/O errors, on a
    /// template without placeholders or approved overrides, and on a
    /// request that supplies neither client data nor a service with a
    /// submitted intake.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerationOutcome, CoreError> {
        let template = TemplateRepo::find_by_public_id(&self.pool, &request.template_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| CoreError::not_found("Template", &request.template_id))?;

        let service = match &request.service_id {
            Some(id) => Some(
                ServiceRepo::find_by_public_id(&self.pool, id)
                    .await
                    .map_err(db_err)?
                    .ok_or_else(|| CoreError::not_found("Service", id))?,
            ),
            None => None,
        };

        let client_data = self.resolve_client_data(&request, service.as_ref()).await?;
        let overrides = self.approved_overrides(service.as_ref()).await?;

        let fields = template
            .fields()
            .map_err(|e| CoreError::Internal(format!("Stored fields are unreadable: {e}")))?;

        let text = self.template_text(&template).await?;
        let output = assemble(&text, &fields, &client_data, &overrides)?;

        let artifact_id = uuid::Uuid::new_v4().to_string();
        let file_name = output_file_name(&template);
        let storage_path = format!("artifacts/{artifact_id}/{file_name}");

        let artifact = match self.write_output(&output.text, &storage_path).await {
            Ok(()) => {
                ArtifactRepo::create(
                    &self.pool,
                    &CreateArtifact {
                        public_id: artifact_id.clone(),
                        template_id: template.id,
                        service_id: service.as_ref().map(|s| s.id),
                        status: STATUS_GENERATED.to_string(),
                        storage_path: Some(storage_path),
                        file_name,
                        unmatched_fields: output.unmatched_fields.clone(),
                        error_message: None,
                    },
                )
                .await
                .map_err(db_err)?
            }
            Err(e) => {
                // Record the failed run in the history, then surface it.
                let message = e.to_string();
                ArtifactRepo::create(
                    &self.pool,
                    &CreateArtifact {
                        public_id: artifact_id.clone(),
                        template_id: template.id,
                        service_id: service.as_ref().map(|s| s.id),
                        status: STATUS_FAILED.to_string(),
                        storage_path: None,
                        file_name,
                        unmatched_fields: vec![],
                        error_message: Some(message),
                    },
                )
                .await
                .map_err(db_err)?;
                return Err(e);
            }
        };

        if let Some(service) = &service {
            ServiceRepo::set_status(&self.pool, service.id, service::STATUS_DOCUMENTS_READY)
                .await
                .map_err(db_err)?;
        }

        tracing::info!(
            artifact_id = %artifact.public_id,
            template_id = %template.public_id,
            unmatched = output.unmatched_fields.len(),
            "Document generated"
        );
        self.event_bus.publish(
            PlatformEvent::new(bus::ARTIFACT_GENERATED)
                .with_entity("artifact", &artifact.public_id)
                .with_payload(serde_json::json!({
                    "template_id": template.public_id,
                    "unmatched_fields": output.unmatched_fields,
                })),
        );

        Ok(GenerationOutcome {
            artifact,
            unmatched_fields: output.unmatched_fields,
        })
    }

    /// Fetch an artifact's bytes for download.
    pub async fn artifact_bytes(&self, artifact: &DocumentArtifact) -> Result<Vec<u8>, CoreError> {
        let path = artifact.storage_path.as_deref().ok_or_else(|| {
            CoreError::InvalidState(format!(
                "Artifact {} has no stored output (status '{}')",
                artifact.public_id, artifact.status
            ))
        })?;
        self.storage
            .get(path)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to read artifact bytes: {e}")))
    }

    async fn resolve_client_data(
        &self,
        request: &GenerateRequest,
        service: Option<&Service>,
    ) -> Result<HashMap<String, String>, CoreError> {
        if let Some(data) = &request.client_data {
            return Ok(data.clone());
        }
        let service = service.ok_or_else(|| {
            CoreError::Validation(
                "Generation requires client_data or a service with a submitted intake".to_string(),
            )
        })?;
        let intake = IntakeRepo::latest_for_service(&self.pool, service.id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Service {} has no submitted intake",
                    service.public_id
                ))
            })?;
        intake
            .data_map()
            .map_err(|e| CoreError::Internal(format!("Stored intake data is unreadable: {e}")))
    }

    async fn approved_overrides(
        &self,
        service: Option<&Service>,
    ) -> Result<Vec<OverrideAction>, CoreError> {
        let Some(service) = service else {
            return Ok(Vec::new());
        };
        let rows = CustomerOverrideRepo::list_approved_for_service(&self.pool, service.id)
            .await
            .map_err(db_err)?;
        rows.iter()
            .map(|row| parse_action(&row.kind, &row.payload))
            .collect()
    }

    /// Read the template's source bytes and extract its text.
    async fn template_text(&self, template: &Template) -> Result<String, CoreError> {
        let storage_path = template.storage_path.as_deref().ok_or_else(|| {
            CoreError::InvalidState(format!(
                "Template {} has no uploaded bytes",
                template.public_id
            ))
        })?;
        let bytes = self
            .storage
            .get(storage_path)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to read template bytes: {e}")))?;
        Ok(formgen_extract::extract_text_typed(&bytes, &template.file_type)?)
    }

    async fn write_output(&self, text: &str, storage_path: &str) -> Result<(), CoreError> {
        let bytes = render_docx(text)?;
        self.storage
            .put(storage_path, &bytes)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to write artifact: {e}")))
    }
}

/// Derive the output file name from the template's original name.
fn output_file_name(template: &Template) -> String {
    let stem = Path::new(&template.original_file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    format!("{stem}-filled.docx")
}
