use async_trait::async_trait;
use embedding::{EmbeddingProvider, TextInput};
use enigma_models::{Backend, GraphHit, HybridError, HybridResult, Location, LocationEdge};
use graph_rag::{GraphConnector, GraphRetrievalClient, GraphStore};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use vector_rag::models::{IndexStats, QueryMatch, VectorRecord};
use vector_rag::{IndexConnector, VectorIndex, VectorRetrievalClient};

use crate::cache::CachedRetrieval;
use crate::llm::{ChatModel, ChatRequest};
use crate::orchestrator::HybridChat;

#[derive(Default)]
pub struct Counters {
    pub embeds: AtomicUsize,
    pub vector_connects: AtomicUsize,
    pub vector_queries: AtomicUsize,
    pub graph_connects: AtomicUsize,
    pub graph_searches: AtomicUsize,
    pub completions: AtomicUsize,
    pub fail_vector: AtomicBool,
    pub fail_graph: AtomicBool,
    pub fail_model: AtomicBool,
}

/// Canned backends sharing one set of counters.
#[derive(Clone)]
pub struct Backends {
    pub counters: Arc<Counters>,
    pub matches: Vec<QueryMatch>,
    pub locations: Vec<GraphHit>,
    pub requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl Backends {
    pub fn travel() -> Self {
        Self {
            counters: Arc::new(Counters::default()),
            matches: vec![
                QueryMatch {
                    id: "doc1".to_string(),
                    score: Some(0.91),
                    metadata: json!({"text_snippet": "Central Park spans 843 acres."}).as_object().cloned(),
                },
                QueryMatch {
                    id: "doc2".to_string(),
                    score: Some(0.74),
                    metadata: json!({"source": "nyc-guide"}).as_object().cloned(),
                },
            ],
            locations: vec![
                GraphHit::new("loc1", "Central Park", "Urban park in Manhattan"),
                GraphHit::new("loc2", "Bryant Park", "Park next to the library"),
            ],
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn vector_queries(&self) -> usize {
        self.counters.vector_queries.load(Ordering::SeqCst)
    }

    pub fn vector_connects(&self) -> usize {
        self.counters.vector_connects.load(Ordering::SeqCst)
    }

    pub fn graph_searches(&self) -> usize {
        self.counters.graph_searches.load(Ordering::SeqCst)
    }

    pub fn graph_connects(&self) -> usize {
        self.counters.graph_connects.load(Ordering::SeqCst)
    }

    pub fn completions(&self) -> usize {
        self.counters.completions.load(Ordering::SeqCst)
    }

    pub fn backend_calls(&self) -> usize {
        self.counters.embeds.load(Ordering::SeqCst)
            + self.vector_connects()
            + self.vector_queries()
            + self.graph_connects()
            + self.graph_searches()
            + self.completions()
    }

    pub fn fail_vector(&self) {
        self.counters.fail_vector.store(true, Ordering::SeqCst);
    }

    pub fn fail_graph(&self) {
        self.counters.fail_graph.store(true, Ordering::SeqCst);
    }

    pub fn fail_model(&self) {
        self.counters.fail_model.store(true, Ordering::SeqCst);
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

struct FakeEmbedder(Arc<Counters>);

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, input: TextInput) -> HybridResult<Vec<Vec<f32>>> {
        self.0.embeds.fetch_add(1, Ordering::SeqCst);
        Ok(input.into_vec().iter().map(|_| vec![0.25, 0.5]).collect())
    }
}

struct FakeIndex(Backends);

#[async_trait]
impl VectorIndex for FakeIndex {
    async fn query(&self, _vector: &[f32], top_k: usize, _include_metadata: bool) -> HybridResult<Vec<QueryMatch>> {
        let counters = &self.0.counters;
        counters.vector_queries.fetch_add(1, Ordering::SeqCst);
        if counters.fail_vector.load(Ordering::SeqCst) {
            return Err(HybridError::upstream(Backend::VectorIndex, "index unavailable"));
        }
        Ok(self.0.matches.iter().take(top_k).cloned().collect())
    }

    async fn upsert(&self, vectors: &[VectorRecord]) -> HybridResult<usize> {
        Ok(vectors.len())
    }

    async fn describe_index_stats(&self) -> HybridResult<IndexStats> {
        Ok(IndexStats::default())
    }
}

struct FakeIndexConnector(Backends);

#[async_trait]
impl IndexConnector for FakeIndexConnector {
    async fn connect(&self) -> HybridResult<Arc<dyn VectorIndex>> {
        self.0.counters.vector_connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FakeIndex(self.0.clone())))
    }
}

struct FakeStore(Backends);

#[async_trait]
impl GraphStore for FakeStore {
    async fn search_locations(&self, query: &str, limit: usize) -> HybridResult<Vec<GraphHit>> {
        let counters = &self.0.counters;
        counters.graph_searches.fetch_add(1, Ordering::SeqCst);
        if counters.fail_graph.load(Ordering::SeqCst) {
            return Err(HybridError::upstream(Backend::GraphDatabase, "connection refused"));
        }
        let needle = query.to_lowercase();
        Ok(self
            .0
            .locations
            .iter()
            .filter(|h| h.name.to_lowercase().contains(&needle) || h.description.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn ensure_location_constraint(&self) -> HybridResult<()> {
        Ok(())
    }

    async fn merge_location(&self, _location: &Location) -> HybridResult<()> {
        Ok(())
    }

    async fn fetch_locations(&self, limit: usize) -> HybridResult<Vec<GraphHit>> {
        Ok(self.0.locations.iter().take(limit).cloned().collect())
    }

    async fn fetch_location_edges(&self, _limit: usize) -> HybridResult<Vec<LocationEdge>> {
        Ok(Vec::new())
    }
}

struct FakeGraphConnector(Backends);

#[async_trait]
impl GraphConnector for FakeGraphConnector {
    async fn connect(&self) -> HybridResult<Arc<dyn GraphStore>> {
        self.0.counters.graph_connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FakeStore(self.0.clone())))
    }
}

struct FakeModel(Backends);

#[async_trait]
impl ChatModel for FakeModel {
    async fn complete(&self, request: ChatRequest) -> HybridResult<String> {
        let counters = &self.0.counters;
        counters.completions.fetch_add(1, Ordering::SeqCst);
        self.0.requests.lock().unwrap().push(request);
        if counters.fail_model.load(Ordering::SeqCst) {
            return Err(HybridError::upstream(Backend::Generation, "rate limited"));
        }
        Ok("Central Park is a large urban park [doc:doc1] [graph:loc1].".to_string())
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

pub fn retrieval(backends: &Backends) -> CachedRetrieval {
    let vector = VectorRetrievalClient::new(
        Arc::new(FakeIndexConnector(backends.clone())),
        Arc::new(FakeEmbedder(backends.counters.clone())),
    );
    let graph = GraphRetrievalClient::new(Arc::new(FakeGraphConnector(backends.clone())));
    CachedRetrieval::new(vector, graph)
}

pub fn chat(backends: &Backends) -> HybridChat {
    HybridChat::new(retrieval(backends), Arc::new(FakeModel(backends.clone())))
}
