use sqlx::PgPool;

use formgen_core::overrides::{STATUS_APPROVED, STATUS_REJECTED};
use formgen_db::models::artifact::{CreateArtifact, STATUS_GENERATED};
use formgen_db::models::customer_override::CreateOverride;
use formgen_db::models::service::CreateService;
use formgen_db::models::template::CreateTemplate;
use formgen_db::repositories::{
    ArtifactRepo, CustomerOverrideRepo, IntakeRepo, ServiceRepo, TemplateRepo,
};

async fn seed_service(pool: &PgPool) -> (i64, i64) {
    let template = TemplateRepo::create(
        pool,
        "tpl-1",
        "tok-1",
        &CreateTemplate {
            name: "Lease".into(),
            original_file_name: "lease.docx".into(),
            file_type: "docx".into(),
        },
    )
    .await
    .unwrap();

    let service = ServiceRepo::create(
        pool,
        "svc-1",
        &CreateService {
            name: "Jane Doe lease".into(),
            owner_ref: "owner-1".into(),
            client_email: "jane@example.com".into(),
            template_ids: vec!["tpl-1".into()],
        },
    )
    .await
    .unwrap();

    (template.id, service.id)
}

#[sqlx::test(migrations = "./migrations")]
async fn test_override_review_is_single_shot(pool: PgPool) {
    let (_, service_id) = seed_service(&pool).await;

    let o = CustomerOverrideRepo::create(
        &pool,
        "ovr-1",
        service_id,
        &CreateOverride {
            kind: "remove_field".into(),
            payload: serde_json::json!({ "name": "ssn" }),
        },
    )
    .await
    .unwrap();
    assert_eq!(o.status, "pending");

    let approved = CustomerOverrideRepo::review(&pool, o.id, STATUS_APPROVED, "admin")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(approved.status, STATUS_APPROVED);
    assert_eq!(approved.reviewed_by.as_deref(), Some("admin"));

    // A second decision observes the guard and loses.
    let second = CustomerOverrideRepo::review(&pool, o.id, STATUS_REJECTED, "admin2")
        .await
        .unwrap();
    assert!(second.is_none());

    let approved_list = CustomerOverrideRepo::list_approved_for_service(&pool, service_id)
        .await
        .unwrap();
    assert_eq!(approved_list.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rejected_override_never_visible_to_generation(pool: PgPool) {
    let (_, service_id) = seed_service(&pool).await;

    let o = CustomerOverrideRepo::create(
        &pool,
        "ovr-1",
        service_id,
        &CreateOverride {
            kind: "custom_clause".into(),
            payload: serde_json::json!({ "text": "Extra clause", "position": "end" }),
        },
    )
    .await
    .unwrap();

    CustomerOverrideRepo::review(&pool, o.id, STATUS_REJECTED, "admin")
        .await
        .unwrap()
        .unwrap();

    let approved = CustomerOverrideRepo::list_approved_for_service(&pool, service_id)
        .await
        .unwrap();
    assert!(approved.is_empty());

    // Still listed for audit, with its rejected status.
    let all = CustomerOverrideRepo::list_for_service(&pool, service_id).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, STATUS_REJECTED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_regeneration_is_additive(pool: PgPool) {
    let (template_id, service_id) = seed_service(&pool).await;

    let make = |public_id: &str| CreateArtifact {
        public_id: public_id.to_string(),
        template_id,
        service_id: Some(service_id),
        status: STATUS_GENERATED.to_string(),
        storage_path: Some(format!("artifacts/{public_id}/lease.docx")),
        file_name: "lease.docx".to_string(),
        unmatched_fields: vec![],
        error_message: None,
    };

    let first = ArtifactRepo::create(&pool, &make("art-1")).await.unwrap();
    let second = ArtifactRepo::create(&pool, &make("art-2")).await.unwrap();
    assert_ne!(first.public_id, second.public_id);

    // The first artifact remains retrievable unchanged.
    let still_there = ArtifactRepo::find_by_public_id(&pool, "art-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(still_there.id, first.id);
    assert_eq!(still_there.storage_path, first.storage_path);

    let history = ArtifactRepo::list_for_template(&pool, template_id).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_latest_intake_wins(pool: PgPool) {
    let (_, service_id) = seed_service(&pool).await;

    IntakeRepo::create(&pool, service_id, &serde_json::json!({ "full_name": "Draft" }))
        .await
        .unwrap();
    IntakeRepo::create(&pool, service_id, &serde_json::json!({ "full_name": "Jane Doe" }))
        .await
        .unwrap();

    let latest = IntakeRepo::latest_for_service(&pool, service_id)
        .await
        .unwrap()
        .unwrap();
    let data = latest.data_map().unwrap();
    assert_eq!(data.get("full_name").map(String::as_str), Some("Jane Doe"));
}
