//! HTTP-level integration tests for the template upload lifecycle.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener. Parsing itself is covered by the
//! pipeline crate; these tests stop at the upload landing.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, patch_json, post_json, put_bytes};
use sqlx::PgPool;

/// Register a template and return its public id and upload token.
async fn register(pool: PgPool, dir: &std::path::Path, file_type: &str) -> (String, String) {
    let app = common::build_test_app(pool, dir);
    let response = post_json(
        app,
        "/api/v1/templates",
        serde_json::json!({
            "name": "Engagement Letter",
            "original_file_name": "engagement.docx",
            "file_type": file_type,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let template_id = json["data"]["template"]["public_id"]
        .as_str()
        .unwrap()
        .to_string();
    let upload_url = json["data"]["upload_url"].as_str().unwrap().to_string();
    let token = upload_url.rsplit('/').next().unwrap().to_string();
    (template_id, token)
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn register_returns_201_with_upload_url(pool: PgPool) {
    let dir = common::test_storage_dir();
    let app = common::build_test_app(pool, &dir);
    let response = post_json(
        app,
        "/api/v1/templates",
        serde_json::json!({
            "name": "NDA",
            "original_file_name": "nda.pdf",
            "file_type": "pdf",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["template"]["status"], "uploaded");
    assert!(json["data"]["upload_url"]
        .as_str()
        .unwrap()
        .contains("/api/v1/uploads/"));
    // The token must never leak through template serialization.
    assert!(json["data"]["template"].get("upload_token").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_publishes_registered_event(pool: PgPool) {
    let dir = common::test_storage_dir();
    let (app, event_bus) = common::build_test_app_with_bus(pool, &dir);
    let mut events = event_bus.subscribe();

    let response = post_json(
        app,
        "/api/v1/templates",
        serde_json::json!({
            "name": "NDA",
            "original_file_name": "nda.pdf",
            "file_type": "pdf",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let template_id = json["data"]["template"]["public_id"].as_str().unwrap();

    let event = events.try_recv().unwrap();
    assert_eq!(event.event_type, "template.registered");
    assert_eq!(event.entity_type.as_deref(), Some("template"));
    assert_eq!(event.entity_id.as_deref(), Some(template_id));
    assert_eq!(event.payload["file_type"], "pdf");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_rejects_unsupported_file_type(pool: PgPool) {
    let dir = common::test_storage_dir();
    let app = common::build_test_app(pool, &dir);
    let response = post_json(
        app,
        "/api/v1/templates",
        serde_json::json!({
            "name": "Spreadsheet",
            "original_file_name": "data.xlsx",
            "file_type": "xlsx",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNSUPPORTED_FORMAT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_rejects_empty_name(pool: PgPool) {
    let dir = common::test_storage_dir();
    let app = common::build_test_app(pool, &dir);
    let response = post_json(
        app,
        "/api/v1/templates",
        serde_json::json!({
            "name": "  ",
            "original_file_name": "nda.pdf",
            "file_type": "pdf",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Upload landing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn upload_lands_bytes_and_consumes_token(pool: PgPool) {
    let dir = common::test_storage_dir();
    let (template_id, token) = register(pool.clone(), &dir, "docx").await;

    let app = common::build_test_app(pool.clone(), &dir);
    let response = put_bytes(
        app,
        &format!("/api/v1/uploads/{token}"),
        b"fake docx bytes".to_vec(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"]["storage_path"]
        .as_str()
        .unwrap()
        .starts_with(&format!("templates/{template_id}/")));
    assert!(json["data"]["content_hash"].is_string());

    // The token is single-use: a second PUT must 404.
    let app = common::build_test_app(pool, &dir);
    let response = put_bytes(
        app,
        &format!("/api/v1/uploads/{token}"),
        b"again".to_vec(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn upload_with_unknown_token_returns_404(pool: PgPool) {
    let dir = common::test_storage_dir();
    let app = common::build_test_app(pool, &dir);
    let response = put_bytes(
        app,
        "/api/v1/uploads/no-such-token",
        b"bytes".to_vec(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn upload_with_empty_body_is_rejected(pool: PgPool) {
    let dir = common::test_storage_dir();
    let (_, token) = register(pool.clone(), &dir, "pdf").await;

    let app = common::build_test_app(pool, &dir);
    let response = put_bytes(app, &format!("/api/v1/uploads/{token}"), Vec::new()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn upload_with_expired_token_returns_410(pool: PgPool) {
    let dir = common::test_storage_dir();
    let (_, token) = register(pool.clone(), &dir, "pdf").await;

    // Age the token past its TTL.
    sqlx::query(
        "UPDATE templates SET upload_token_expires_at = NOW() - INTERVAL '1 minute' \
         WHERE upload_token = $1",
    )
    .bind(&token)
    .execute(&pool)
    .await
    .unwrap();

    let app = common::build_test_app(pool, &dir);
    let response = put_bytes(app, &format!("/api/v1/uploads/{token}"), b"late".to_vec()).await;
    assert_eq!(response.status(), StatusCode::GONE);
}

// ---------------------------------------------------------------------------
// Metadata edit and version stamps
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn metadata_edit_with_stale_version_returns_409(pool: PgPool) {
    let dir = common::test_storage_dir();
    let (template_id, _) = register(pool.clone(), &dir, "docx").await;

    // First edit with the current stamp succeeds and bumps the version.
    let app = common::build_test_app(pool.clone(), &dir);
    let response = patch_json(
        app,
        &format!("/api/v1/templates/{template_id}"),
        serde_json::json!({ "name": "Renamed", "version": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Renamed");
    assert_eq!(json["data"]["version"], 2);

    // Replaying the old stamp conflicts.
    let app = common::build_test_app(pool, &dir);
    let response = patch_json(
        app,
        &format!("/api/v1/templates/{template_id}"),
        serde_json::json!({ "name": "Stale", "version": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Re-parse
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn reparse_before_upload_returns_409(pool: PgPool) {
    let dir = common::test_storage_dir();
    let (template_id, _) = register(pool.clone(), &dir, "pdf").await;

    let app = common::build_test_app(pool, &dir);
    let response = post_json(
        app,
        &format!("/api/v1/templates/{template_id}/reparse"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reparse_after_upload_is_accepted(pool: PgPool) {
    let dir = common::test_storage_dir();
    let (template_id, token) = register(pool.clone(), &dir, "docx").await;

    let app = common::build_test_app(pool.clone(), &dir);
    let response = put_bytes(
        app,
        &format!("/api/v1/uploads/{token}"),
        b"bytes".to_vec(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool, &dir);
    let response = post_json(
        app,
        &format!("/api/v1/templates/{template_id}/reparse"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "parsing");
}

// ---------------------------------------------------------------------------
// Editor locks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn lock_is_exclusive_between_editors(pool: PgPool) {
    let dir = common::test_storage_dir();
    let (template_id, _) = register(pool.clone(), &dir, "pdf").await;

    let app = common::build_test_app(pool.clone(), &dir);
    let response = post_json(
        app,
        &format!("/api/v1/templates/{template_id}/lock"),
        serde_json::json!({ "holder": "alice" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // A second editor is refused while the lock is live.
    let app = common::build_test_app(pool.clone(), &dir);
    let response = post_json(
        app,
        &format!("/api/v1/templates/{template_id}/lock"),
        serde_json::json!({ "holder": "bob" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Re-acquiring as the same holder refreshes instead of conflicting.
    let app = common::build_test_app(pool, &dir);
    let response = post_json(
        app,
        &format!("/api/v1/templates/{template_id}/lock"),
        serde_json::json!({ "holder": "alice" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn get_nonexistent_template_returns_404(pool: PgPool) {
    let dir = common::test_storage_dir();
    let app = common::build_test_app(pool, &dir);
    let response = get(app, "/api/v1/templates/no-such-id").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_templates_returns_registered_rows(pool: PgPool) {
    let dir = common::test_storage_dir();
    register(pool.clone(), &dir, "pdf").await;
    register(pool.clone(), &dir, "docx").await;

    let app = common::build_test_app(pool, &dir);
    let response = get(app, "/api/v1/templates").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}
