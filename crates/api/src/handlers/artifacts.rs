//! Handlers for generated document artifacts.
//!
//! Artifact rows are insert-only history; these endpoints read them
//! and stream the stored bytes for download.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use formgen_core::error::CoreError;
use formgen_core::template::FileType;
use formgen_db::models::artifact::{DocumentArtifact, STATUS_GENERATED};
use formgen_db::repositories::ArtifactRepo;

use crate::error::AppResult;
use crate::handlers::services::find_service;
use crate::handlers::templates::find_template;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/artifacts/{artifact_id}
pub async fn get_artifact(
    State(state): State<AppState>,
    Path(artifact_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let artifact = find_artifact(&state, &artifact_id).await?;
    Ok(Json(DataResponse { data: artifact }))
}

/// GET /api/v1/artifacts/{artifact_id}/download
///
/// Stream the artifact's bytes with the DOCX content type. Failed
/// artifacts have no bytes to serve.
pub async fn download_artifact(
    State(state): State<AppState>,
    Path(artifact_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let artifact = find_artifact(&state, &artifact_id).await?;

    if artifact.status != STATUS_GENERATED {
        return Err(CoreError::InvalidState(format!(
            "artifact {artifact_id} failed generation and has no file"
        ))
        .into());
    }

    let bytes = state.generator.artifact_bytes(&artifact).await?;

    let headers = [
        // Rendered output is always DOCX regardless of the source format.
        (
            header::CONTENT_TYPE,
            FileType::Docx.content_type().to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.file_name),
        ),
    ];

    Ok((headers, bytes))
}

/// GET /api/v1/templates/{template_id}/artifacts
///
/// Generation history for a template, newest first.
pub async fn list_for_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let template = find_template(&state, &template_id).await?;
    let artifacts = ArtifactRepo::list_for_template(&state.pool, template.id).await?;
    Ok(Json(DataResponse { data: artifacts }))
}

/// GET /api/v1/services/{service_id}/artifacts
///
/// Generation history for a service, newest first.
pub async fn list_for_service(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let service = find_service(&state, &service_id).await?;
    let artifacts = ArtifactRepo::list_for_service(&state.pool, service.id).await?;
    Ok(Json(DataResponse { data: artifacts }))
}

/// Look up an artifact by public ID or fail with a 404.
async fn find_artifact(state: &AppState, public_id: &str) -> AppResult<DocumentArtifact> {
    ArtifactRepo::find_by_public_id(&state.pool, public_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Artifact", public_id).into())
}
