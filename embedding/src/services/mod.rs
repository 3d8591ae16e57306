use async_trait::async_trait;
use enigma_models::{Backend, HybridError, HybridResult};

use crate::models::TextInput;

pub mod openai;

pub use openai::OpenAiEmbeddingClient;

/// Turns texts into vectors. Output has the same length and order as the
/// input. Implementations do not retry.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, input: TextInput) -> HybridResult<Vec<Vec<f32>>>;

    async fn embed_one(&self, text: &str) -> HybridResult<Vec<f32>> {
        self.embed(TextInput::from(text))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| HybridError::upstream(Backend::Embedding, "no embedding returned"))
    }
}
