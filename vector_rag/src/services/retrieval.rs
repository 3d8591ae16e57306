use embedding::{EmbeddingProvider, OpenAiEmbeddingClient};
use enigma_models::{DocumentHit, HybridError, HybridResult};
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::{IndexConnector, PineconeConnector, VectorIndex};

/// Top-k similarity search over the document index.
///
/// The index handle is built on first use and then kept for the life of the
/// client. A failed connection attempt is not remembered; the next call
/// tries again.
pub struct VectorRetrievalClient {
    connector: Arc<dyn IndexConnector>,
    embedder: Arc<dyn EmbeddingProvider>,
    handle: OnceCell<Arc<dyn VectorIndex>>,
}

impl VectorRetrievalClient {
    pub fn new(connector: Arc<dyn IndexConnector>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            connector,
            embedder,
            handle: OnceCell::new(),
        }
    }

    /// Pinecone + OpenAI embeddings. Reads no credentials yet.
    pub fn from_env() -> HybridResult<Self> {
        let embedder = OpenAiEmbeddingClient::from_env()?;
        Ok(Self::new(Arc::new(PineconeConnector), Arc::new(embedder)))
    }

    async fn handle(&self) -> HybridResult<&Arc<dyn VectorIndex>> {
        self.handle
            .get_or_try_init(|| async { self.connector.connect().await })
            .await
    }

    /// Build the index handle now instead of on the first search.
    pub async fn prewarm(&self) -> HybridResult<()> {
        self.handle().await.map(|_| ())
    }

    pub fn is_warm(&self) -> bool {
        self.handle.initialized()
    }

    pub async fn search(&self, query: &str, top_k: usize) -> HybridResult<Vec<DocumentHit>> {
        if top_k == 0 {
            return Err(HybridError::InvalidArgument("top_k must be at least 1".to_string()));
        }

        let index = self.handle().await?;
        let vector = self.embedder.embed_one(query).await?;
        let matches = index.query(&vector, top_k, true).await?;

        tracing::debug!(top_k, hits = matches.len(), "Vector search completed");
        Ok(matches.into_iter().map(DocumentHit::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IndexStats, QueryMatch, VectorRecord};
    use async_trait::async_trait;
    use embedding::TextInput;
    use enigma_config::ConfigError;
    use enigma_models::Backend;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, input: TextInput) -> HybridResult<Vec<Vec<f32>>> {
            Ok(input.into_vec().iter().map(|_| vec![0.1, 0.2]).collect())
        }
    }

    struct FakeIndex {
        matches: Vec<QueryMatch>,
        queries: Mutex<Vec<(Vec<f32>, usize, bool)>>,
    }

    #[async_trait]
    impl VectorIndex for FakeIndex {
        async fn query(&self, vector: &[f32], top_k: usize, include_metadata: bool) -> HybridResult<Vec<QueryMatch>> {
            self.queries.lock().unwrap().push((vector.to_vec(), top_k, include_metadata));
            Ok(self.matches.clone())
        }

        async fn upsert(&self, vectors: &[VectorRecord]) -> HybridResult<usize> {
            Ok(vectors.len())
        }

        async fn describe_index_stats(&self) -> HybridResult<IndexStats> {
            Ok(IndexStats::default())
        }
    }

    struct CountingConnector {
        index: Arc<FakeIndex>,
        connects: AtomicUsize,
        failures_left: AtomicUsize,
    }

    impl CountingConnector {
        fn new(matches: Vec<QueryMatch>) -> Arc<Self> {
            Arc::new(Self {
                index: Arc::new(FakeIndex {
                    matches,
                    queries: Mutex::new(Vec::new()),
                }),
                connects: AtomicUsize::new(0),
                failures_left: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl IndexConnector for CountingConnector {
        async fn connect(&self) -> HybridResult<Arc<dyn VectorIndex>> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(ConfigError::Missing("PINECONE_API_KEY").into());
            }
            Ok(self.index.clone())
        }
    }

    fn hit(id: &str, score: f32, metadata: serde_json::Value) -> QueryMatch {
        QueryMatch {
            id: id.to_string(),
            score: Some(score),
            metadata: metadata.as_object().cloned(),
        }
    }

    #[tokio::test]
    async fn zero_matches_is_an_empty_vec() {
        let connector = CountingConnector::new(Vec::new());
        let client = VectorRetrievalClient::new(connector, Arc::new(FixedEmbedder));

        let hits = client.search("nowhere", 3).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn keeps_backend_order_and_requests_metadata() {
        let connector = CountingConnector::new(vec![
            hit("doc2", 0.7, json!({"source": "guide"})),
            hit("doc1", 0.9, json!({"text_snippet": "Central Park"})),
        ]);
        let client = VectorRetrievalClient::new(connector.clone(), Arc::new(FixedEmbedder));

        let hits = client.search("park", 2).await.unwrap();

        let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["doc2", "doc1"]);
        assert_eq!(hits[1].preferred_text(), "Central Park");

        let queries = connector.index.queries.lock().unwrap();
        assert_eq!(queries.as_slice(), &[(vec![0.1, 0.2], 2, true)]);
    }

    #[tokio::test]
    async fn handle_is_built_once() {
        let connector = CountingConnector::new(Vec::new());
        let client = VectorRetrievalClient::new(connector.clone(), Arc::new(FixedEmbedder));

        assert!(!client.is_warm());
        client.prewarm().await.unwrap();
        client.search("a", 1).await.unwrap();
        client.search("b", 1).await.unwrap();

        assert!(client.is_warm());
        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_connect_is_retried_on_next_call() {
        let connector = CountingConnector::new(Vec::new());
        connector.failures_left.store(1, Ordering::SeqCst);
        let client = VectorRetrievalClient::new(connector.clone(), Arc::new(FixedEmbedder));

        let err = client.search("a", 1).await.unwrap_err();
        assert!(err.is_configuration());
        assert!(!client.is_warm());

        client.search("a", 1).await.unwrap();
        assert_eq!(connector.connects.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_top_k_is_rejected_without_connecting() {
        let connector = CountingConnector::new(Vec::new());
        let client = VectorRetrievalClient::new(connector.clone(), Arc::new(FixedEmbedder));

        let err = client.search("a", 0).await.unwrap_err();
        assert!(matches!(err, HybridError::InvalidArgument(_)));
        assert_eq!(err.backend(), None::<Backend>);
        assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
    }
}
