//! Field extractor: completion call plus the strict JSON boundary.

use async_trait::async_trait;
use serde::Deserialize;

use formgen_core::field::{placeholder_text, validate_fields, FieldDef, FieldKind};

use crate::prompt::{build_extraction_prompt, EXTRACTION_MAX_TOKENS, EXTRACTION_TEMPERATURE};
use crate::AiError;

/// A completion model, reduced to the single call this pipeline needs.
///
/// Implemented by [`OpenAiClient`](crate::OpenAiClient) in production
/// and by in-process fakes in tests.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one completion and return the raw response content.
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, AiError>;
}

/// The raw field object the model is asked to produce.
///
/// Every attribute the pipeline needs is required here; a response
/// missing any of them fails deserialization and rejects the whole
/// batch. `deny_unknown_fields` is deliberately not used — models add
/// harmless extras like `example`.
#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    #[serde(rename = "type")]
    kind: FieldKind,
    label: String,
    #[serde(default)]
    description: Option<String>,
    required: bool,
    #[serde(default)]
    options: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    fields: Vec<RawField>,
}

/// Extracts typed form fields from document text via a completion model.
pub struct FieldExtractor<C> {
    client: C,
}

impl<C: CompletionClient> FieldExtractor<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Extract fields from document text.
    ///
    /// Builds the fixed prompt, runs the completion at low temperature,
    /// and parses the content strictly. Any malformed response — not
    /// JSON, missing `fields`, unknown kind, missing attribute,
    /// duplicate names, options on a non-choice kind — fails the whole
    /// call; no partial results escape this boundary.
    pub async fn extract_fields(&self, document_text: &str) -> Result<Vec<FieldDef>, AiError> {
        let prompt = build_extraction_prompt(document_text);
        let content = self
            .client
            .complete(&prompt, EXTRACTION_TEMPERATURE, EXTRACTION_MAX_TOKENS)
            .await?;

        let fields = parse_response(&content)?;
        tracing::info!(count = fields.len(), "AI field extraction complete");
        Ok(fields)
    }
}

/// Parse and normalize the model response content.
pub(crate) fn parse_response(content: &str) -> Result<Vec<FieldDef>, AiError> {
    let trimmed = strip_code_fence(content.trim());
    if trimmed.is_empty() {
        return Err(AiError::EmptyResponse);
    }

    let raw: RawResponse = serde_json::from_str(trimmed)
        .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

    let fields: Vec<FieldDef> = raw
        .fields
        .into_iter()
        .map(|f| {
            let placeholder = placeholder_text(f.kind, &f.label);
            FieldDef {
                id: uuid::Uuid::new_v4().to_string(),
                name: f.name,
                label: f.label,
                kind: f.kind,
                required: f.required,
                description: f.description,
                options: f.options,
                locations: None,
                confidence: None,
                placeholder,
            }
        })
        .collect();

    validate_fields(&fields).map_err(|e| AiError::InvalidResponse(e.to_string()))?;
    Ok(fields)
}

/// Strip a Markdown code fence if the model wrapped its JSON in one.
/// Anything else non-JSON still fails the strict parse afterwards.
fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    // Skip an optional language tag on the fence line.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start_matches(['\r', '\n']);
    rest.strip_suffix("```").map(str::trim).unwrap_or(content)
}
