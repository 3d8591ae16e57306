use enigma_models::{DocumentHit, Metadata};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One vector to write, with its id and metadata kept together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl From<QueryMatch> for DocumentHit {
    fn from(m: QueryMatch) -> Self {
        DocumentHit::new(m.id, m.score.unwrap_or_default(), m.metadata.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMetric {
    Cosine,
    Euclidean,
    Dotproduct,
}

impl fmt::Display for IndexMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndexMetric::Cosine => "cosine",
            IndexMetric::Euclidean => "euclidean",
            IndexMetric::Dotproduct => "dotproduct",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceStats {
    #[serde(default)]
    pub vector_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    #[serde(default)]
    pub dimension: Option<usize>,
    #[serde(default)]
    pub index_fullness: f32,
    #[serde(default)]
    pub total_vector_count: u64,
    #[serde(default)]
    pub namespaces: HashMap<String, NamespaceStats>,
}

// ============================================================================
// Pinecone REST request/response types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryRequest<'a> {
    pub vector: &'a [f32],
    pub top_k: usize,
    pub include_metadata: bool,
    pub include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub matches: Vec<QueryMatch>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpsertRequest<'a> {
    pub vectors: &'a [VectorRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpsertResponse {
    #[serde(default)]
    pub upserted_count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateIndexRequest<'a> {
    pub name: &'a str,
    pub dimension: usize,
    pub metric: IndexMetric,
    pub spec: IndexSpec<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct IndexSpec<'a> {
    pub serverless: ServerlessSpec<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ServerlessSpec<'a> {
    pub cloud: &'a str,
    pub region: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IndexList {
    #[serde(default)]
    pub indexes: Vec<IndexDescription>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct IndexDescription {
    pub name: String,
    #[serde(default)]
    pub host: Option<String>,
}
