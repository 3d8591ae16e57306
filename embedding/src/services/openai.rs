use async_trait::async_trait;
use enigma_config::OpenAiEndpoint;
use enigma_models::{Backend, HybridError, HybridResult};
use reqwest::Client;
use std::time::Duration;

use super::EmbeddingProvider;
use crate::models::{OpenAIEmbeddingRequest, OpenAIEmbeddingResponse, TextInput};

/// OpenAI `/embeddings` client.
///
/// The API key is looked up on every call, not at construction. Building a
/// client needs no credentials.
pub struct OpenAiEmbeddingClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OpenAiEmbeddingClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> HybridResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HybridError::upstream(Backend::Embedding, format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn from_env() -> HybridResult<Self> {
        let endpoint = OpenAiEndpoint::from_env()?;
        Self::new(endpoint.base_url, endpoint.embedding_model, endpoint.timeout)
    }

}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingClient {
    async fn embed(&self, input: TextInput) -> HybridResult<Vec<Vec<f32>>> {
        let api_key = enigma_config::openai_api_key()?;

        let texts = input.into_vec();
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(model = %self.model, count = texts.len(), "Requesting embeddings");

        let request = OpenAIEmbeddingRequest {
            model: &self.model,
            input: &texts,
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| HybridError::upstream(Backend::Embedding, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(HybridError::upstream(
                Backend::Embedding,
                format!("OpenAI API error ({}): {}", status, error_text),
            ));
        }

        let mut body: OpenAIEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| HybridError::upstream(Backend::Embedding, format!("malformed response: {}", e)))?;

        if body.data.len() != texts.len() {
            return Err(HybridError::upstream(
                Backend::Embedding,
                format!("expected {} embeddings, got {}", texts.len(), body.data.len()),
            ));
        }

        body.data.sort_by_key(|d| d.index);
        Ok(body.data.into_iter().map(|d| d.embedding).collect())
    }
}
