//! Handlers for services and client intake submissions.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use formgen_core::error::CoreError;
use formgen_core::service::{STATUS_INTAKE_SENT, STATUS_INTAKE_SUBMITTED};
use formgen_db::models::service::{CreateService, Service};
use formgen_db::repositories::{IntakeRepo, ServiceRepo, TemplateRepo};
use formgen_events::bus::INTAKE_SUBMITTED;
use formgen_events::PlatformEvent;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/services
///
/// Bundle one or more parsed templates for a client. Every referenced
/// template must exist.
pub async fn create_service(
    State(state): State<AppState>,
    Json(input): Json<CreateService>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("service name must not be empty".into()).into());
    }
    if input.client_email.trim().is_empty() {
        return Err(CoreError::Validation("client email must not be empty".into()).into());
    }
    if input.template_ids.is_empty() {
        return Err(
            CoreError::Validation("service must reference at least one template".into()).into(),
        );
    }

    for template_id in &input.template_ids {
        TemplateRepo::find_by_public_id(&state.pool, template_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Template", template_id.clone()))?;
    }

    let public_id = Uuid::new_v4().to_string();
    let service = ServiceRepo::create(&state.pool, &public_id, &input).await?;

    tracing::info!(
        service_id = %service.public_id,
        templates = input.template_ids.len(),
        "Service created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: service })))
}

/// GET /api/v1/services
pub async fn list_services(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let services = ServiceRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: services }))
}

/// GET /api/v1/services/{service_id}
pub async fn get_service(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let service = find_service(&state, &service_id).await?;
    Ok(Json(DataResponse { data: service }))
}

/// Body for an explicit service status update.
#[derive(Debug, Deserialize)]
pub struct UpdateServiceStatus {
    pub status: String,
}

/// PATCH /api/v1/services/{service_id}
///
/// Move a service to an explicit lifecycle status, e.g. `completed`
/// once documents have been delivered. The intake endpoints advance
/// the common statuses themselves; this is the manual path.
pub async fn update_service_status(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
    Json(input): Json<UpdateServiceStatus>,
) -> AppResult<impl IntoResponse> {
    formgen_core::service::validate_status(&input.status)?;

    let service = find_service(&state, &service_id).await?;

    let updated = ServiceRepo::set_status(&state.pool, service.id, &input.status)
        .await?
        .ok_or_else(|| CoreError::not_found("Service", service_id.clone()))?;

    tracing::info!(
        service_id = %updated.public_id,
        status = %updated.status,
        "Service status updated"
    );

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/services/{service_id}/send-intake
///
/// Mark the intake form as delivered to the client.
pub async fn send_intake(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let service = find_service(&state, &service_id).await?;

    let updated = ServiceRepo::set_status(&state.pool, service.id, STATUS_INTAKE_SENT)
        .await?
        .ok_or_else(|| CoreError::not_found("Service", service_id.clone()))?;

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/services/{service_id}/intake
///
/// Record a client intake submission: a flat field-name → value map.
/// Resubmission appends a new row; generation always reads the latest.
pub async fn submit_intake(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
    Json(data): Json<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    if data.is_empty() {
        return Err(CoreError::Validation("intake submission must not be empty".into()).into());
    }

    let service = find_service(&state, &service_id).await?;

    let intake = IntakeRepo::create(&state.pool, service.id, &json!(data)).await?;

    ServiceRepo::set_status(&state.pool, service.id, STATUS_INTAKE_SUBMITTED).await?;

    state.event_bus.publish(
        PlatformEvent::new(INTAKE_SUBMITTED)
            .with_entity("service", service.public_id.clone())
            .with_payload(json!({ "intake_id": intake.id })),
    );

    tracing::info!(
        service_id = %service.public_id,
        fields = data.len(),
        "Intake submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: intake })))
}

/// Look up a service by public ID or fail with a 404.
pub(crate) async fn find_service(state: &AppState, public_id: &str) -> AppResult<Service> {
    ServiceRepo::find_by_public_id(&state.pool, public_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Service", public_id).into())
}
