use async_trait::async_trait;
use enigma_models::{GraphHit, HybridResult, Location, LocationEdge};
use std::sync::Arc;

pub mod neo4j_client;
pub mod queries;

pub use neo4j_client::{Neo4jClient, Neo4jConnector};

/// Operations on `Location` nodes. Row order is whatever the store returns.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Case-insensitive substring match on name or description, at most `limit` rows.
    async fn search_locations(&self, query: &str, limit: usize) -> HybridResult<Vec<GraphHit>>;

    async fn ensure_location_constraint(&self) -> HybridResult<()>;

    /// Insert or update a node keyed by `id`.
    async fn merge_location(&self, location: &Location) -> HybridResult<()>;

    async fn fetch_locations(&self, limit: usize) -> HybridResult<Vec<GraphHit>>;

    async fn fetch_location_edges(&self, limit: usize) -> HybridResult<Vec<LocationEdge>>;
}

/// Opens a new connection to the graph store.
#[async_trait]
pub trait GraphConnector: Send + Sync {
    async fn connect(&self) -> HybridResult<Arc<dyn GraphStore>>;
}
