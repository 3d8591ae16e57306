use async_trait::async_trait;
use enigma_config::OpenAiEndpoint;
use enigma_models::{Backend, HybridError, HybridResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ChatMessage, ChatModel, ChatRequest};

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI `/chat/completions` client. Like the embedding client, it reads
/// the API key per request.
pub struct OpenAiChatClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> HybridResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HybridError::upstream(Backend::Generation, format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn from_env() -> HybridResult<Self> {
        let endpoint = OpenAiEndpoint::from_env()?;
        Self::new(endpoint.base_url, endpoint.chat_model, endpoint.timeout)
    }
}

#[async_trait]
impl ChatModel for OpenAiChatClient {
    async fn complete(&self, request: ChatRequest) -> HybridResult<String> {
        let api_key = enigma_config::openai_api_key()?;

        let body = OpenAIRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(model = %request.model, turns = request.messages.len(), "Requesting chat completion");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| HybridError::upstream(Backend::Generation, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(HybridError::upstream(
                Backend::Generation,
                format!("OpenAI API error ({}): {}", status, error_text),
            ));
        }

        let parsed: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| HybridError::upstream(Backend::Generation, format!("malformed response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| HybridError::upstream(Backend::Generation, "No response from OpenAI"))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
