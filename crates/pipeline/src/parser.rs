//! Upload-completed handler: text extraction and AI field extraction.

use std::sync::Arc;

use formgen_ai::{CompletionClient, FieldExtractor};
use formgen_core::template::{can_transition, template_id_from_path, STATUS_PARSING};
use formgen_core::CoreError;
use formgen_db::models::template::Template;
use formgen_db::repositories::TemplateRepo;
use formgen_db::DbPool;
use formgen_events::{bus, EventBus, PlatformEvent};
use formgen_storage::BlobStorage;

use crate::db_err;

/// Handles the storage upload-completed trigger for a template.
///
/// All collaborators are passed in at construction so tests can run
/// the whole flow against a temp-dir storage and a fake completion
/// client. The handler is idempotent: redelivered events re-claim or
/// skip, and re-running the extraction work writes the same outcome.
pub struct TemplateParser<C> {
    pool: DbPool,
    storage: Arc<dyn BlobStorage>,
    extractor: FieldExtractor<C>,
    event_bus: Arc<EventBus>,
}

impl<C: CompletionClient> TemplateParser<C> {
    pub fn new(
        pool: DbPool,
        storage: Arc<dyn BlobStorage>,
        extractor: FieldExtractor<C>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            pool,
            storage,
            extractor,
            event_bus,
        }
    }

    /// Handle an upload-completed event for a storage object path.
    ///
    /// Extraction failures are terminal for the template: they are
    /// recorded on the row (`status=error`) and the handler returns
    /// `Ok` — the event was handled, there is nothing to retry. Only
    /// infrastructure failures (database unreachable) propagate.
    pub async fn handle_upload_completed(&self, storage_path: &str) -> Result<(), CoreError> {
        let public_id = template_id_from_path(storage_path).ok_or_else(|| {
            CoreError::Validation(format!(
                "Storage path '{storage_path}' is not a template object"
            ))
        })?;

        let template = TemplateRepo::find_by_public_id(&self.pool, public_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| CoreError::not_found("Template", public_id))?;

        // A redelivered event for a template already in a terminal
        // status is a no-op; skip it without attempting the claim.
        if !can_transition(&template.status, STATUS_PARSING, false) {
            tracing::info!(
                template_id = public_id,
                status = %template.status,
                "Template not claimable, skipping redelivered event"
            );
            return Ok(());
        }

        // Claim the parsing stage. The guard re-checks the status, so a
        // concurrent transition between the read above and this update
        // still resolves to a skip.
        let Some(template) = TemplateRepo::claim_parsing(&self.pool, template.id)
            .await
            .map_err(db_err)?
        else {
            tracing::info!(
                template_id = public_id,
                "Template already in a terminal status, skipping redelivered event"
            );
            return Ok(());
        };

        tracing::info!(template_id = %template.public_id, "Template parsing started");
        self.event_bus.publish(
            PlatformEvent::new(bus::TEMPLATE_PARSING)
                .with_entity("template", &template.public_id),
        );
        self.parse_claimed(&template).await
    }

    /// Run extraction for a template already claimed into `parsing`.
    async fn parse_claimed(&self, template: &Template) -> Result<(), CoreError> {
        match self.extract(template).await {
            Ok(fields) => {
                let fields_json = serde_json::to_value(&fields)
                    .map_err(|e| CoreError::Internal(format!("Field serialization failed: {e}")))?;
                TemplateRepo::store_parsed(&self.pool, template.id, &fields_json)
                    .await
                    .map_err(db_err)?;

                tracing::info!(
                    template_id = %template.public_id,
                    field_count = fields.len(),
                    "Template parsed"
                );
                self.event_bus.publish(
                    PlatformEvent::new(bus::TEMPLATE_PARSED)
                        .with_entity("template", &template.public_id)
                        .with_payload(serde_json::json!({ "field_count": fields.len() })),
                );
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                TemplateRepo::store_error(&self.pool, template.id, &message)
                    .await
                    .map_err(db_err)?;

                tracing::error!(
                    template_id = %template.public_id,
                    error = %message,
                    "Template parsing failed"
                );
                self.event_bus.publish(
                    PlatformEvent::new(bus::TEMPLATE_PARSE_FAILED)
                        .with_entity("template", &template.public_id)
                        .with_payload(serde_json::json!({ "error": message })),
                );
                Ok(())
            }
        }
    }

    /// The fallible extraction stages: bytes -> text -> fields.
    async fn extract(
        &self,
        template: &Template,
    ) -> Result<Vec<formgen_core::field::FieldDef>, CoreError> {
        let storage_path = template.storage_path.as_deref().ok_or_else(|| {
            CoreError::Extraction("Template has no uploaded bytes in storage".to_string())
        })?;

        let bytes = self
            .storage
            .get(storage_path)
            .await
            .map_err(|e| CoreError::Extraction(format!("Failed to read template bytes: {e}")))?;

        let text = formgen_extract::extract_text_typed(&bytes, &template.file_type)?;

        let fields = self.extractor.extract_fields(&text).await?;
        Ok(fields)
    }
}
