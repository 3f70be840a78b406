//! Production completion client backed by the OpenAI chat API.

use async_openai::config::OpenAIConfig;
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use async_openai::Client;
use async_trait::async_trait;

use crate::extractor::CompletionClient;
use crate::AiError;

/// Configuration for [`OpenAiClient`], passed in explicitly at
/// construction (no ambient globals) so tests and alternate deployments
/// can substitute their own.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key. Read from `OPENAI_API_KEY` by the binary.
    pub api_key: String,
    /// Model name, e.g. `gpt-4o-mini`.
    pub model: String,
    /// Optional API base override (proxies, compatible servers).
    pub api_base: Option<String>,
}

/// [`CompletionClient`] implementation over `async-openai`.
pub struct OpenAiClient {
    client: Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key);
        if let Some(base) = config.api_base {
            openai_config = openai_config.with_api_base(base);
        }
        Self {
            client: Client::with_config(openai_config),
            model: config.model,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, AiError> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| AiError::Request(e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(temperature)
            .max_tokens(max_tokens)
            .messages([message.into()])
            .build()
            .map_err(|e| AiError::Request(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AiError::Request(e.to_string()))?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(AiError::EmptyResponse)?;

        tracing::debug!(
            model = %self.model,
            chars = content.len(),
            "Completion received"
        );
        Ok(content)
    }
}
