//! End-to-end parsing flow: upload-completed trigger through claim,
//! extraction, and outcome persistence, with a scripted completion
//! client standing in for the model.

use std::io::{Cursor, Write};
use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::broadcast::error::TryRecvError;

use formgen_ai::{AiError, CompletionClient, FieldExtractor};
use formgen_core::template::{storage_path, STATUS_ERROR, STATUS_PARSED};
use formgen_core::CoreError;
use formgen_db::models::template::{CreateTemplate, Template};
use formgen_db::repositories::TemplateRepo;
use formgen_events::{bus, EventBus, PlatformEvent};
use formgen_pipeline::TemplateParser;
use formgen_storage::{BlobStorage, LocalStorage};

/// A completion client that always answers with a canned string.
struct ScriptedClient {
    reply: String,
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(
        &self,
        _prompt: &str,
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<String, AiError> {
        Ok(self.reply.clone())
    }
}

const VALID_REPLY: &str = r#"{"fields": [
    {"name": "client_name", "type": "text", "label": "Client Name", "required": true},
    {"name": "lease_start", "type": "date", "label": "Lease Start", "required": false}
]}"#;

/// Minimal DOCX-shaped package carrying the given document text.
fn docx_bytes(text: &str) -> Vec<u8> {
    let xml = format!(
        "<w:document><w:body><w:p><w:r><w:t>{text}</w:t></w:r></w:p></w:body></w:document>"
    );
    let mut buf = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buf);
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap();
    }
    buf.into_inner()
}

struct Harness {
    parser: TemplateParser<ScriptedClient>,
    storage: Arc<dyn BlobStorage>,
    events: tokio::sync::broadcast::Receiver<PlatformEvent>,
    pool: PgPool,
}

/// Build a parser against a temp-dir storage and the scripted client,
/// with a subscribed receiver to observe published events.
async fn harness(pool: PgPool, reply: &str) -> Harness {
    let dir = std::env::temp_dir().join(format!("formgen-parser-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();

    let storage: Arc<dyn BlobStorage> = Arc::new(LocalStorage::new(&dir));
    let event_bus = Arc::new(EventBus::default());
    let events = event_bus.subscribe();

    let extractor = FieldExtractor::new(ScriptedClient {
        reply: reply.to_string(),
    });
    let parser = TemplateParser::new(pool.clone(), Arc::clone(&storage), extractor, event_bus);

    Harness {
        parser,
        storage,
        events,
        pool,
    }
}

/// Register a template and land its bytes in the harness storage,
/// returning the row and the storage object path.
async fn uploaded_template(h: &Harness, public_id: &str) -> (Template, String) {
    let input = CreateTemplate {
        name: "Lease agreement".to_string(),
        original_file_name: "lease.docx".to_string(),
        file_type: "docx".to_string(),
    };
    let template = TemplateRepo::create(&h.pool, public_id, "tok-1", &input)
        .await
        .unwrap();

    let path = storage_path(public_id, "lease.docx");
    h.storage
        .put(&path, &docx_bytes("Client Name: ____ Lease Start: ____"))
        .await
        .unwrap();

    let template = TemplateRepo::record_upload(&h.pool, template.id, &path, "abc123")
        .await
        .unwrap()
        .unwrap();
    (template, path)
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_upload_completed_parses_and_stores_fields(pool: PgPool) {
    let mut h = harness(pool, VALID_REPLY).await;
    let (template, path) = uploaded_template(&h, "tpl-1").await;

    h.parser.handle_upload_completed(&path).await.unwrap();

    let t = TemplateRepo::find_by_id(&h.pool, template.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(t.status, STATUS_PARSED);
    assert!(t.error_message.is_none());

    let fields = t.fields().unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name, "client_name");
    assert!(fields[0].required);

    let first = h.events.try_recv().unwrap();
    assert_eq!(first.event_type, bus::TEMPLATE_PARSING);
    assert_eq!(first.entity_id.as_deref(), Some("tpl-1"));
    let second = h.events.try_recv().unwrap();
    assert_eq!(second.event_type, bus::TEMPLATE_PARSED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_malformed_model_reply_recorded_as_error(pool: PgPool) {
    let mut h = harness(pool, "here are your fields: name, date").await;
    let (template, path) = uploaded_template(&h, "tpl-1").await;

    // Extraction failures are handled, not propagated.
    h.parser.handle_upload_completed(&path).await.unwrap();

    let t = TemplateRepo::find_by_id(&h.pool, template.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(t.status, STATUS_ERROR);
    assert!(t.error_message.is_some());
    assert_eq!(t.extracted_fields, serde_json::json!([]));

    let first = h.events.try_recv().unwrap();
    assert_eq!(first.event_type, bus::TEMPLATE_PARSING);
    let second = h.events.try_recv().unwrap();
    assert_eq!(second.event_type, bus::TEMPLATE_PARSE_FAILED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_redelivered_event_after_parse_is_a_noop(pool: PgPool) {
    let mut h = harness(pool, VALID_REPLY).await;
    let (template, path) = uploaded_template(&h, "tpl-1").await;

    h.parser.handle_upload_completed(&path).await.unwrap();
    while h.events.try_recv().is_ok() {}

    h.parser.handle_upload_completed(&path).await.unwrap();

    let t = TemplateRepo::find_by_id(&h.pool, template.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(t.status, STATUS_PARSED);
    assert_eq!(t.fields().unwrap().len(), 2);
    assert_matches!(h.events.try_recv(), Err(TryRecvError::Empty));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_foreign_storage_path_rejected(pool: PgPool) {
    let h = harness(pool, VALID_REPLY).await;

    let err = h
        .parser
        .handle_upload_completed("artifacts/abc/out.docx")
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Validation(_));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_template_rejected(pool: PgPool) {
    let h = harness(pool, VALID_REPLY).await;

    let err = h
        .parser
        .handle_upload_completed("templates/no-such/lease.docx")
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::NotFound { .. });
}
