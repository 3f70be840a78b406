//! Handlers for the customer override review workflow.
//!
//! Customers submit overrides against a service; every submission
//! lands `pending` and only an explicit review decision moves it to
//! `approved` or `rejected`. Generation consumes approved overrides
//! only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use formgen_core::error::CoreError;
use formgen_core::overrides::{parse_action, STATUS_APPROVED, STATUS_REJECTED};
use formgen_db::models::customer_override::CreateOverride;
use formgen_db::repositories::CustomerOverrideRepo;
use formgen_events::bus::{OVERRIDE_APPROVED, OVERRIDE_REJECTED, OVERRIDE_SUBMITTED};
use formgen_events::PlatformEvent;

use crate::error::AppResult;
use crate::handlers::services::find_service;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/services/{service_id}/overrides
///
/// Customer submits an override request. The action payload is parsed
/// strictly up front so malformed requests are rejected here rather
/// than at generation time.
pub async fn submit_override(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
    Json(input): Json<CreateOverride>,
) -> AppResult<impl IntoResponse> {
    let service = find_service(&state, &service_id).await?;

    parse_action(&input.kind, &input.payload)?;

    let public_id = Uuid::new_v4().to_string();
    let created =
        CustomerOverrideRepo::create(&state.pool, &public_id, service.id, &input).await?;

    state.event_bus.publish(
        PlatformEvent::new(OVERRIDE_SUBMITTED)
            .with_entity("override", created.public_id.clone())
            .with_payload(json!({ "service_id": service.public_id, "kind": created.kind })),
    );

    tracing::info!(
        override_id = %created.public_id,
        service_id = %service.public_id,
        kind = %created.kind,
        "Override submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/services/{service_id}/overrides
///
/// List a service's overrides with their review status, newest first.
pub async fn list_overrides(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let service = find_service(&state, &service_id).await?;

    let overrides = CustomerOverrideRepo::list_for_service(&state.pool, service.id).await?;

    Ok(Json(DataResponse { data: overrides }))
}

/// Request body for a review decision.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    /// Admin identity recorded on the decision.
    pub reviewer: String,
}

/// POST /api/v1/overrides/{override_id}/approve
pub async fn approve_override(
    State(state): State<AppState>,
    Path(override_id): Path<String>,
    Json(input): Json<ReviewRequest>,
) -> AppResult<impl IntoResponse> {
    review_override(state, override_id, input, STATUS_APPROVED, OVERRIDE_APPROVED).await
}

/// POST /api/v1/overrides/{override_id}/reject
pub async fn reject_override(
    State(state): State<AppState>,
    Path(override_id): Path<String>,
    Json(input): Json<ReviewRequest>,
) -> AppResult<impl IntoResponse> {
    review_override(state, override_id, input, STATUS_REJECTED, OVERRIDE_REJECTED).await
}

/// Shared review path. The decision applies only while the override is
/// still pending; a second decision (or a racing one) conflicts.
async fn review_override(
    state: AppState,
    override_id: String,
    input: ReviewRequest,
    decision: &'static str,
    event_type: &'static str,
) -> AppResult<impl IntoResponse> {
    if input.reviewer.trim().is_empty() {
        return Err(CoreError::Validation("reviewer must not be empty".into()).into());
    }

    let existing = CustomerOverrideRepo::find_by_public_id(&state.pool, &override_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Override", override_id.clone()))?;

    let reviewed =
        CustomerOverrideRepo::review(&state.pool, existing.id, decision, &input.reviewer)
            .await?
            .ok_or_else(|| {
                CoreError::InvalidState(format!(
                    "override {override_id} has already been reviewed"
                ))
            })?;

    state.event_bus.publish(
        PlatformEvent::new(event_type)
            .with_entity("override", reviewed.public_id.clone())
            .with_payload(json!({ "reviewer": input.reviewer })),
    );

    tracing::info!(
        override_id = %reviewed.public_id,
        decision = decision,
        reviewer = %input.reviewer,
        "Override reviewed"
    );

    Ok(Json(DataResponse { data: reviewed }))
}
