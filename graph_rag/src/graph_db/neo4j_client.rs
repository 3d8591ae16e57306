use async_trait::async_trait;
use enigma_config::Neo4jSettings;
use enigma_models::{Backend, GraphHit, HybridError, HybridResult, Location, LocationEdge};
use neo4rs::{query, ConfigBuilder, Graph, Query, Row};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::queries;
use super::{GraphConnector, GraphStore};

/// Neo4j client compatible with both local Neo4j and Neo4j AuraDB.
///
/// Dropping the client releases its pooled connections.
pub struct Neo4jClient {
    graph: Graph,
    timeout: Duration,
}

impl Neo4jClient {
    /// Connect and run a trivial query so that a bad URI or credentials
    /// fail here rather than on the first search.
    ///
    /// Supported URIs:
    ///   - Local: `bolt://localhost:7687`
    ///   - AuraDB: `neo4j+s://xxxxx.databases.neo4j.io`
    pub async fn connect(settings: &Neo4jSettings) -> HybridResult<Self> {
        tracing::info!(uri = %settings.uri, "🔷 Connecting to Neo4j");

        let config = ConfigBuilder::default()
            .uri(settings.uri.as_str())
            .user(settings.user.as_str())
            .password(settings.password.as_str())
            .db(settings.database.as_str())
            .fetch_size(500)
            .max_connections(4)
            .build()
            .map_err(|e| neo4j_error(format!("failed to build Neo4j config: {}", e)))?;

        let connect = async {
            let graph = Graph::connect(config).await?;
            let mut result = graph.execute(query("RETURN 1 AS test")).await?;
            result.next().await?;
            Ok::<_, neo4rs::Error>(graph)
        };

        let graph = within(settings.timeout, connect).await.map_err(|e| match e {
            HybridError::Upstream { message, .. } => {
                neo4j_error(format!("failed to connect to Neo4j: {}", message))
            }
            other => other,
        })?;

        tracing::info!("✅ Neo4j connection established");

        Ok(Self {
            graph,
            timeout: settings.timeout,
        })
    }

    async fn rows(&self, q: Query) -> HybridResult<Vec<Row>> {
        let graph = &self.graph;
        within(self.timeout, async move {
            let mut stream = graph.execute(q).await?;
            let mut rows = Vec::new();
            while let Some(row) = stream.next().await? {
                rows.push(row);
            }
            Ok::<_, neo4rs::Error>(rows)
        })
        .await
    }

    async fn run(&self, q: Query) -> HybridResult<()> {
        within(self.timeout, self.graph.run(q)).await
    }
}

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn search_locations(&self, search: &str, limit: usize) -> HybridResult<Vec<GraphHit>> {
        let rows = self
            .rows(
                query(queries::SEARCH_LOCATIONS)
                    .param("query", search)
                    .param("limit", limit as i64),
            )
            .await?;

        tracing::debug!(limit, hits = rows.len(), "Graph search completed");
        Ok(rows.iter().map(graph_hit).collect())
    }

    async fn ensure_location_constraint(&self) -> HybridResult<()> {
        if let Err(e) = self.run(query(queries::LOCATION_CONSTRAINT)).await {
            tracing::debug!(error = %e, "Constraint syntax rejected, trying legacy form");
            if let Err(e) = self.run(query(queries::LEGACY_LOCATION_CONSTRAINT)).await {
                tracing::warn!(error = %e, "Could not create Location id constraint; continuing without it");
            }
        }
        Ok(())
    }

    async fn merge_location(&self, location: &Location) -> HybridResult<()> {
        self.run(
            query(queries::MERGE_LOCATION)
                .param("id", location.id.as_str())
                .param("name", location.name.as_str())
                .param("lat", location.lat)
                .param("lon", location.lon)
                .param("description", location.description.as_str())
                .param("tags", location.tags.as_str()),
        )
        .await
    }

    async fn fetch_locations(&self, limit: usize) -> HybridResult<Vec<GraphHit>> {
        let rows = self
            .rows(query(queries::FETCH_LOCATIONS).param("limit", limit as i64))
            .await?;
        Ok(rows.iter().map(graph_hit).collect())
    }

    async fn fetch_location_edges(&self, limit: usize) -> HybridResult<Vec<LocationEdge>> {
        let rows = self
            .rows(query(queries::FETCH_LOCATION_EDGES).param("limit", limit as i64))
            .await?;

        Ok(rows
            .iter()
            .map(|row| LocationEdge {
                from: text(row, "a"),
                to: text(row, "b"),
                rel_type: text(row, "type"),
            })
            .collect())
    }
}

/// Reads settings from the environment on every connect.
#[derive(Debug, Default, Clone, Copy)]
pub struct Neo4jConnector;

#[async_trait]
impl GraphConnector for Neo4jConnector {
    async fn connect(&self) -> HybridResult<Arc<dyn GraphStore>> {
        let settings = Neo4jSettings::from_env()?;
        Ok(Arc::new(Neo4jClient::connect(&settings).await?))
    }
}

fn graph_hit(row: &Row) -> GraphHit {
    GraphHit::new(text(row, "id"), text(row, "name"), text(row, "description"))
}

/// Missing and null properties both read as "".
fn text(row: &Row, key: &str) -> String {
    row.get::<Option<String>>(key).ok().flatten().unwrap_or_default()
}

fn neo4j_error(message: impl std::fmt::Display) -> HybridError {
    HybridError::upstream(Backend::GraphDatabase, message)
}

async fn within<T, F>(limit: Duration, fut: F) -> HybridResult<T>
where
    F: Future<Output = Result<T, neo4rs::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(neo4j_error),
        Err(_) => Err(neo4j_error(format!("request timed out after {:?}", limit))),
    }
}
