use async_trait::async_trait;
use enigma_config::PineconeSettings;
use enigma_models::{Backend, HybridError, HybridResult};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::{IndexAdmin, IndexConnector, VectorIndex};
use crate::models::{
    CreateIndexRequest, IndexDescription, IndexList, IndexMetric, IndexSpec, IndexStats, QueryMatch,
    QueryRequest, QueryResponse, ServerlessSpec, UpsertRequest, UpsertResponse, VectorRecord,
};

const API_VERSION: &str = "2024-07";
const DEFAULT_REGION: &str = "us-east-1";

/// Pinecone control-plane client (list/create/describe indexes).
pub struct PineconeClient {
    client: Client,
    controller_url: String,
    api_key: String,
    cloud: String,
    region: String,
    index_host: Option<String>,
    namespace: Option<String>,
}

impl PineconeClient {
    pub fn new(settings: &PineconeSettings) -> HybridResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| HybridError::upstream(Backend::VectorIndex, format!("failed to create HTTP client: {}", e)))?;

        tracing::info!(controller = %settings.controller_url, "Pinecone client initialized");

        Ok(Self {
            client,
            controller_url: settings.controller_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            cloud: settings.cloud.clone(),
            region: settings
                .environment
                .clone()
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            index_host: settings.index_host.clone(),
            namespace: settings.namespace.clone(),
        })
    }

    pub fn from_env() -> HybridResult<Self> {
        Self::new(&PineconeSettings::from_env()?)
    }

    async fn describe_index(&self, name: &str) -> HybridResult<IndexDescription> {
        let url = format!("{}/indexes/{}", self.controller_url, urlencoding::encode(name));
        let response = send(self.client.get(url), &self.api_key).await?;
        read_json(response).await
    }
}

#[async_trait]
impl IndexAdmin for PineconeClient {
    async fn list_indexes(&self) -> HybridResult<Vec<String>> {
        let url = format!("{}/indexes", self.controller_url);
        let response = send(self.client.get(url), &self.api_key).await?;
        let list: IndexList = read_json(response).await?;
        Ok(list.indexes.into_iter().map(|i| i.name).collect())
    }

    async fn create_index(&self, name: &str, dimension: usize, metric: IndexMetric) -> HybridResult<()> {
        let request = CreateIndexRequest {
            name,
            dimension,
            metric,
            spec: IndexSpec {
                serverless: ServerlessSpec {
                    cloud: &self.cloud,
                    region: &self.region,
                },
            },
        };

        let url = format!("{}/indexes", self.controller_url);
        send(self.client.post(url).json(&request), &self.api_key).await?;

        tracing::info!(index = %name, dimension, %metric, "Created Pinecone index");
        Ok(())
    }

    async fn index(&self, name: &str) -> HybridResult<Arc<dyn VectorIndex>> {
        let host = match &self.index_host {
            Some(host) => host.clone(),
            None => self.describe_index(name).await?.host.ok_or_else(|| {
                HybridError::upstream(Backend::VectorIndex, format!("index '{}' has no host yet", name))
            })?,
        };

        Ok(Arc::new(PineconeIndex {
            client: self.client.clone(),
            host: normalize_host(&host),
            api_key: self.api_key.clone(),
            namespace: self.namespace.clone(),
        }))
    }
}

/// Data-plane handle for one index. Cheap to clone internally; the
/// underlying `reqwest::Client` pools connections.
pub struct PineconeIndex {
    client: Client,
    host: String,
    api_key: String,
    namespace: Option<String>,
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(&self, vector: &[f32], top_k: usize, include_metadata: bool) -> HybridResult<Vec<QueryMatch>> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata,
            include_values: false,
            namespace: self.namespace.as_deref(),
        };

        let url = format!("{}/query", self.host);
        let response = send(self.client.post(url).json(&request), &self.api_key).await?;
        let body: QueryResponse = read_json(response).await?;

        tracing::debug!(top_k, matches = body.matches.len(), "Pinecone query completed");
        Ok(body.matches)
    }

    async fn upsert(&self, vectors: &[VectorRecord]) -> HybridResult<usize> {
        if vectors.is_empty() {
            return Ok(0);
        }

        let request = UpsertRequest {
            vectors,
            namespace: self.namespace.as_deref(),
        };

        let url = format!("{}/vectors/upsert", self.host);
        let response = send(self.client.post(url).json(&request), &self.api_key).await?;
        let body: UpsertResponse = read_json(response).await?;

        let count = body.upserted_count.unwrap_or(vectors.len());
        tracing::debug!(count, "Upserted vectors");
        Ok(count)
    }

    async fn describe_index_stats(&self) -> HybridResult<IndexStats> {
        let url = format!("{}/describe_index_stats", self.host);
        let response = send(
            self.client.post(url).json(&serde_json::json!({})),
            &self.api_key,
        )
        .await?;
        read_json(response).await
    }
}

/// Connects to the index named by `PINECONE_INDEX_NAME`. Configuration is
/// read at connect time, not when the connector is created.
#[derive(Debug, Default, Clone, Copy)]
pub struct PineconeConnector;

#[async_trait]
impl IndexConnector for PineconeConnector {
    async fn connect(&self) -> HybridResult<Arc<dyn VectorIndex>> {
        let settings = PineconeSettings::from_env()?;
        let index_name = settings.require_index_name()?.to_string();
        let client = PineconeClient::new(&settings)?;

        tracing::info!(index = %index_name, "🔷 Connecting to Pinecone index");
        client.index(&index_name).await
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

async fn send(request: RequestBuilder, api_key: &str) -> HybridResult<Response> {
    let response = request
        .header("Api-Key", api_key)
        .header("X-Pinecone-API-Version", API_VERSION)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| HybridError::upstream(Backend::VectorIndex, e))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(HybridError::upstream(
            Backend::VectorIndex,
            format!("Pinecone API error ({}): {}", status, error_text),
        ));
    }

    Ok(response)
}

async fn read_json<R: DeserializeOwned>(response: Response) -> HybridResult<R> {
    response
        .json()
        .await
        .map_err(|e| HybridError::upstream(Backend::VectorIndex, format!("malformed response: {}", e)))
}
