//! Handler for the one-time upload landing endpoint.
//!
//! Clients PUT the raw file bytes to the token URL issued at
//! registration. Landing the bytes consumes the token and kicks off
//! asynchronous field extraction via the event bus.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;

use formgen_core::error::CoreError;
use formgen_core::hashing::sha256_hex;
use formgen_core::template;
use formgen_db::repositories::TemplateRepo;
use formgen_events::bus::TEMPLATE_UPLOAD_COMPLETED;
use formgen_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// PUT /api/v1/uploads/{token}
///
/// Accept the registered file's bytes. The token is single-use: it is
/// nulled once the bytes land, and expires unused after its TTL.
pub async fn put_upload(
    State(state): State<AppState>,
    Path(token): Path<String>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let template = TemplateRepo::find_by_upload_token(&state.pool, &token)
        .await?
        .ok_or_else(|| CoreError::not_found("Upload", token.clone()))?;

    let expires_at = template
        .upload_token_expires_at
        .ok_or_else(|| AppError::Gone("upload token has expired".into()))?;
    if expires_at < Utc::now() {
        return Err(AppError::Gone("upload token has expired".into()));
    }

    if body.is_empty() {
        return Err(CoreError::Validation("upload body must not be empty".into()).into());
    }

    let storage_path = template::storage_path(&template.public_id, &template.original_file_name);
    let content_hash = sha256_hex(&body);

    state.storage.put(&storage_path, &body).await?;

    let template = TemplateRepo::record_upload(&state.pool, template.id, &storage_path, &content_hash)
        .await?
        .ok_or_else(|| CoreError::not_found("Template", template.public_id.clone()))?;

    state.event_bus.publish(
        PlatformEvent::new(TEMPLATE_UPLOAD_COMPLETED)
            .with_entity("template", template.public_id.clone())
            .with_payload(json!({ "storage_path": storage_path })),
    );

    tracing::info!(
        template_id = %template.public_id,
        size = body.len(),
        hash = %content_hash,
        "Upload completed"
    );

    Ok(Json(DataResponse { data: template }))
}
