use enigma_models::{DocumentHit, GraphHit, HybridResult};
use enigma_observability::log_stage;
use graph_rag::{GraphRetrievalClient, DEFAULT_GRAPH_LIMIT};
use std::sync::Arc;
use vector_rag::VectorRetrievalClient;

use crate::cache::{CacheStats, CachedRetrieval};
use crate::evidence::Evidence;
use crate::llm::{ChatMessage, ChatModel, ChatRequest, OpenAiChatClient};
use crate::prompt;

pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";
pub const ANSWER_TOP_K: usize = 3;
pub const TEMPERATURE: f32 = 0.2;
pub const MAX_TOKENS: u32 = 400;

/// Answers one question end to end: documents, then graph facts, then one
/// generation call. Errors from any stage abort the answer unchanged.
pub struct HybridChat {
    retrieval: CachedRetrieval,
    model: Arc<dyn ChatModel>,
}

impl HybridChat {
    pub fn new(retrieval: CachedRetrieval, model: Arc<dyn ChatModel>) -> Self {
        Self { retrieval, model }
    }

    /// Production wiring. Only tunables are read here; credentials are read
    /// when a backend is first used.
    pub fn from_env() -> HybridResult<Self> {
        let vector = VectorRetrievalClient::from_env()?;
        let graph = GraphRetrievalClient::from_env();
        let model = OpenAiChatClient::from_env()?;
        tracing::info!(model = model.model_name(), "Hybrid chat configured");
        Ok(Self::new(CachedRetrieval::new(vector, graph), Arc::new(model)))
    }

    pub async fn answer(&self, query: &str) -> HybridResult<String> {
        // Fail fast on the generation credential before spending any
        // retrieval calls.
        enigma_config::openai_api_key()?;

        let docs = log_stage!("vector_search", self.retrieval.documents(query, ANSWER_TOP_K))?;
        let graph = log_stage!("graph_search", self.retrieval.graph_hits(query, DEFAULT_GRAPH_LIMIT))?;

        let prompt = prompt::compose(query, &docs, &graph);
        let request = ChatRequest {
            model: self.model.model_name().to_string(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let answer = log_stage!("generation", self.model.complete(request))?;
        tracing::info!(
            documents = docs.len(),
            graph_facts = graph.len(),
            answer_chars = answer.len(),
            "Answer generated"
        );
        Ok(answer)
    }

    pub async fn document_evidence(&self, query: &str, top_k: usize) -> Evidence<DocumentHit> {
        let result = self
            .retrieval
            .documents(query, top_k)
            .await
            .map(|hits| hits.as_ref().clone());
        Evidence::from_result("documents", result)
    }

    pub async fn graph_evidence(&self, query: &str) -> Evidence<GraphHit> {
        let result = self
            .retrieval
            .graph_hits(query, DEFAULT_GRAPH_LIMIT)
            .await
            .map(|hits| hits.as_ref().clone());
        Evidence::from_result("graph", result)
    }

    pub fn clear_cache(&self) {
        self.retrieval.clear();
    }

    pub async fn prewarm(&self) -> HybridResult<()> {
        self.retrieval.prewarm().await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.retrieval.stats()
    }
}
