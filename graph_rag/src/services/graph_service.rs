use enigma_models::{GraphHit, HybridError, HybridResult};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::graph_db::{GraphConnector, GraphStore, Neo4jConnector};

pub const DEFAULT_GRAPH_LIMIT: usize = 3;

/// Keyword search over location nodes.
///
/// Unless [`prewarm`](Self::prewarm) has been called, every search opens its
/// own connection and closes it before returning. The graph driver is built
/// for short-lived sessions, unlike the vector index handle.
pub struct GraphRetrievalClient {
    connector: Arc<dyn GraphConnector>,
    warm: OnceCell<Arc<dyn GraphStore>>,
}

impl GraphRetrievalClient {
    pub fn new(connector: Arc<dyn GraphConnector>) -> Self {
        Self {
            connector,
            warm: OnceCell::new(),
        }
    }

    /// Neo4j, configured from the environment on each connect.
    pub fn from_env() -> Self {
        Self::new(Arc::new(Neo4jConnector))
    }

    /// Keep one connection open and reuse it for every later search.
    pub async fn prewarm(&self) -> HybridResult<()> {
        self.warm
            .get_or_try_init(|| async { self.connector.connect().await })
            .await
            .map(|_| ())
    }

    pub fn is_warm(&self) -> bool {
        self.warm.initialized()
    }

    /// Up to `limit` locations whose name or description contains `query`,
    /// ignoring case. Result order is decided by the database.
    pub async fn search(&self, query: &str, limit: usize) -> HybridResult<Vec<GraphHit>> {
        if limit == 0 {
            return Err(HybridError::InvalidArgument("limit must be at least 1".to_string()));
        }

        if let Some(store) = self.warm.get() {
            return store.search_locations(query, limit).await;
        }

        let store = self.connector.connect().await?;
        let result = store.search_locations(query, limit).await;
        drop(store);
        tracing::debug!("Released graph connection");

        result
    }
}
