use async_trait::async_trait;
use enigma_models::HybridResult;
use std::sync::Arc;

use crate::models::{IndexMetric, IndexStats, QueryMatch, VectorRecord};

pub mod retrieval;
pub mod vector_store;

pub use retrieval::VectorRetrievalClient;
pub use vector_store::{PineconeClient, PineconeConnector, PineconeIndex};

/// Data-plane operations on one index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Matches come back in backend order (descending score).
    async fn query(&self, vector: &[f32], top_k: usize, include_metadata: bool) -> HybridResult<Vec<QueryMatch>>;

    /// Returns the number of vectors the backend reports as written.
    async fn upsert(&self, vectors: &[VectorRecord]) -> HybridResult<usize>;

    async fn describe_index_stats(&self) -> HybridResult<IndexStats>;
}

/// Control-plane operations. Only ingestion uses these.
#[async_trait]
pub trait IndexAdmin: Send + Sync {
    async fn list_indexes(&self) -> HybridResult<Vec<String>>;

    async fn create_index(&self, name: &str, dimension: usize, metric: IndexMetric) -> HybridResult<()>;

    async fn index(&self, name: &str) -> HybridResult<Arc<dyn VectorIndex>>;
}

/// Builds the process-wide index handle on first use.
#[async_trait]
pub trait IndexConnector: Send + Sync {
    async fn connect(&self) -> HybridResult<Arc<dyn VectorIndex>>;
}
