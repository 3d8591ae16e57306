use dashmap::DashMap;
use enigma_models::{DocumentHit, GraphHit, HybridResult};
use graph_rag::GraphRetrievalClient;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use vector_rag::VectorRetrievalClient;

type Key = (String, usize);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Process-lifetime memo of retrieval results keyed by the full argument
/// tuple. No expiry and no size bound; [`clear`](Self::clear) is the only way
/// entries leave. Errors are never stored.
#[derive(Default)]
pub struct QueryCache {
    documents: DashMap<Key, Arc<Vec<DocumentHit>>>,
    graph: DashMap<Key, Arc<Vec<GraphHit>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn documents<F, Fut>(&self, query: &str, top_k: usize, fetch: F) -> HybridResult<Arc<Vec<DocumentHit>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HybridResult<Vec<DocumentHit>>>,
    {
        self.get_or_fetch(&self.documents, (query.to_string(), top_k), fetch).await
    }

    pub async fn graph_hits<F, Fut>(&self, query: &str, limit: usize, fetch: F) -> HybridResult<Arc<Vec<GraphHit>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HybridResult<Vec<GraphHit>>>,
    {
        self.get_or_fetch(&self.graph, (query.to_string(), limit), fetch).await
    }

    // The map guard is released before awaiting, so two concurrent misses on
    // the same key may both fetch; the later insert wins.
    async fn get_or_fetch<K, V, F, Fut>(&self, map: &DashMap<K, Arc<V>>, key: K, fetch: F) -> HybridResult<Arc<V>>
    where
        K: Eq + Hash,
        F: FnOnce() -> Fut,
        Fut: Future<Output = HybridResult<V>>,
    {
        if let Some(hit) = map.get(&key).map(|entry| Arc::clone(entry.value())) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = Arc::new(fetch().await?);
        map.insert(key, Arc::clone(&value));
        Ok(value)
    }

    pub fn clear(&self) {
        let dropped = self.len();
        self.documents.clear();
        self.graph.clear();
        tracing::info!(dropped, "Cleared retrieval cache");
    }

    pub fn len(&self) -> usize {
        self.documents.len() + self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

/// The two retrieval clients behind one result cache. Connection handles
/// live inside the clients; results live here.
pub struct CachedRetrieval {
    vector: VectorRetrievalClient,
    graph: GraphRetrievalClient,
    cache: QueryCache,
}

impl CachedRetrieval {
    pub fn new(vector: VectorRetrievalClient, graph: GraphRetrievalClient) -> Self {
        Self {
            vector,
            graph,
            cache: QueryCache::new(),
        }
    }

    pub async fn documents(&self, query: &str, top_k: usize) -> HybridResult<Arc<Vec<DocumentHit>>> {
        self.cache
            .documents(query, top_k, || self.vector.search(query, top_k))
            .await
    }

    pub async fn graph_hits(&self, query: &str, limit: usize) -> HybridResult<Arc<Vec<GraphHit>>> {
        self.cache
            .graph_hits(query, limit, || self.graph.search(query, limit))
            .await
    }

    /// Drop every cached result. Connection handles stay open.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Open the vector index handle and a long-lived graph connection.
    pub async fn prewarm(&self) -> HybridResult<()> {
        self.vector.prewarm().await?;
        self.graph.prewarm().await?;
        tracing::info!("Retrieval clients prewarmed");
        Ok(())
    }

    pub fn is_warm(&self) -> bool {
        self.vector.is_warm() && self.graph.is_warm()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
