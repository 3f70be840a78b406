//! AI field extraction.
//!
//! Sends extracted document text to a completion model and parses the
//! response into typed [`FieldDef`](formgen_core::field::FieldDef)
//! records at a strict parse-or-reject boundary. The model call itself
//! is behind the [`CompletionClient`] trait so tests substitute a fake;
//! [`OpenAiClient`] is the production implementation.

mod extractor;
mod openai;
mod prompt;

pub use extractor::{CompletionClient, FieldExtractor};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use prompt::build_extraction_prompt;

/// Errors from the AI extraction stage.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The completion call itself failed (network, auth, quota).
    #[error("Completion request failed: {0}")]
    Request(String),

    /// The model returned no content at all.
    #[error("Completion returned no content")]
    EmptyResponse,

    /// The content was not valid JSON of the expected shape. The whole
    /// response is rejected; there are no partial results.
    #[error("Completion response is not valid field JSON: {0}")]
    InvalidResponse(String),
}

impl From<AiError> for formgen_core::CoreError {
    fn from(err: AiError) -> Self {
        formgen_core::CoreError::AiExtraction(err.to_string())
    }
}
