//! Handlers for template registration, metadata, re-parsing, and
//! editor locks.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use formgen_core::error::CoreError;
use formgen_core::template::{FileType, EDITOR_LOCK_TTL_MINUTES};
use formgen_db::models::template::{CreateTemplate, Template, UpdateTemplate};
use formgen_db::repositories::TemplateRepo;
use formgen_events::bus::{TEMPLATE_REGISTERED, TEMPLATE_REPARSE_REQUESTED};
use formgen_events::PlatformEvent;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for a successful upload registration: the created template
/// plus the one-time upload URL the client PUTs the file bytes to.
#[derive(Debug, Serialize)]
pub struct RegisterUploadResponse {
    pub template: Template,
    pub upload_url: String,
}

/// POST /api/v1/templates
///
/// Register a template upload. Validates the file type up front and
/// issues a short-lived upload token; no bytes are accepted here.
pub async fn register_template(
    State(state): State<AppState>,
    Json(input): Json<CreateTemplate>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("template name must not be empty".into()).into());
    }
    if input.original_file_name.trim().is_empty() {
        return Err(CoreError::Validation("file name must not be empty".into()).into());
    }
    FileType::parse(&input.file_type)?;

    let public_id = Uuid::new_v4().to_string();
    let upload_token = Uuid::new_v4().to_string();

    let template = TemplateRepo::create(&state.pool, &public_id, &upload_token, &input).await?;

    tracing::info!(
        template_id = %template.public_id,
        file_type = %template.file_type,
        "Template registered"
    );
    state.event_bus.publish(
        PlatformEvent::new(TEMPLATE_REGISTERED)
            .with_entity("template", &template.public_id)
            .with_payload(json!({
                "name": &template.name,
                "file_type": &template.file_type,
            })),
    );

    let response = RegisterUploadResponse {
        upload_url: state.config.upload_url(&upload_token),
        template,
    };

    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// GET /api/v1/templates
pub async fn list_templates(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let templates = TemplateRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// GET /api/v1/templates/{template_id}
///
/// Fetch a template including its extracted fields and status.
pub async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let template = find_template(&state, &template_id).await?;
    Ok(Json(DataResponse { data: template }))
}

/// PATCH /api/v1/templates/{template_id}
///
/// Metadata edit carrying the version stamp the editor read. A stale
/// stamp is rejected with a conflict so the editor can reload.
pub async fn update_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
    Json(input): Json<UpdateTemplate>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(CoreError::Validation("template name must not be empty".into()).into());
        }
    }

    let template = find_template(&state, &template_id).await?;

    let updated = TemplateRepo::update_metadata(&state.pool, template.id, &input)
        .await?
        .ok_or_else(|| {
            CoreError::Conflict(format!(
                "template {template_id} was modified by someone else; reload and retry"
            ))
        })?;

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/templates/{template_id}/reparse
///
/// Explicitly restart field extraction for an already-uploaded
/// template. This is the only path that re-enters `parsing` from a
/// terminal status.
pub async fn reparse_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let template = find_template(&state, &template_id).await?;

    let storage_path = template.storage_path.clone().ok_or_else(|| {
        CoreError::InvalidState(format!(
            "template {template_id} has no uploaded file to re-parse"
        ))
    })?;

    let claimed = TemplateRepo::begin_reparse(&state.pool, template.id)
        .await?
        .ok_or_else(|| {
            CoreError::InvalidState(format!("template {template_id} cannot be re-parsed"))
        })?;

    state.event_bus.publish(
        PlatformEvent::new(TEMPLATE_REPARSE_REQUESTED)
            .with_entity("template", claimed.public_id.clone())
            .with_payload(json!({ "storage_path": storage_path })),
    );

    tracing::info!(template_id = %claimed.public_id, "Re-parse requested");

    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: claimed })))
}

/// Request body for lock acquire/release.
#[derive(Debug, Deserialize)]
pub struct LockRequest {
    /// Opaque editor identity (session or user reference).
    pub holder: String,
}

/// POST /api/v1/templates/{template_id}/lock
///
/// Acquire or refresh the editor lock. Refused while another editor
/// holds a live lock.
pub async fn acquire_lock(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
    Json(input): Json<LockRequest>,
) -> AppResult<impl IntoResponse> {
    if input.holder.trim().is_empty() {
        return Err(CoreError::Validation("lock holder must not be empty".into()).into());
    }

    let template = find_template(&state, &template_id).await?;

    let locked = TemplateRepo::acquire_lock(
        &state.pool,
        template.id,
        &input.holder,
        EDITOR_LOCK_TTL_MINUTES,
    )
    .await?
    .ok_or_else(|| {
        CoreError::Conflict(format!(
            "template {template_id} is locked by another editor"
        ))
    })?;

    Ok(Json(DataResponse { data: locked }))
}

/// DELETE /api/v1/templates/{template_id}/lock
///
/// Release the editor lock. Releasing a lock you do not hold is a
/// no-op, not an error.
pub async fn release_lock(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
    Json(input): Json<LockRequest>,
) -> AppResult<impl IntoResponse> {
    let template = find_template(&state, &template_id).await?;

    let released = TemplateRepo::release_lock(&state.pool, template.id, &input.holder).await?;

    Ok(Json(DataResponse {
        data: json!({ "released": released }),
    }))
}

/// Look up a template by public ID or fail with a 404.
pub(crate) async fn find_template(state: &AppState, public_id: &str) -> AppResult<Template> {
    TemplateRepo::find_by_public_id(&state.pool, public_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Template", public_id).into())
}
