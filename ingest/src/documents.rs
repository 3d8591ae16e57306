use embedding::{EmbeddingProvider, TextInput};
use enigma_config::IngestSettings;
use enigma_models::{DocumentRecord, HybridResult, Metadata};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use vector_rag::{IndexAdmin, IndexMetric, VectorIndex, VectorRecord};

use crate::errors::IngestResult;

#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub index_name: String,
    pub batch_size: usize,
    /// Total attempts per batch, including the first.
    pub retry_max: u32,
    pub retry_backoff: Duration,
    pub dry_run: bool,
}

impl UploadOptions {
    pub fn from_settings(settings: &IngestSettings, dry_run: bool) -> Self {
        Self {
            index_name: settings.index_name.clone(),
            batch_size: settings.batch_size.max(1),
            retry_max: settings.retry_max.max(1),
            retry_backoff: settings.retry_backoff,
            dry_run,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub documents: usize,
    pub embedded: usize,
    pub batches: usize,
    pub upserted: usize,
    pub created_index: bool,
}

#[derive(Debug, Deserialize)]
struct DocumentRow {
    id: String,
    text: String,
    #[serde(default)]
    metadata: String,
}

/// Metadata cells hold a JSON object. Anything else is kept verbatim under
/// `source`.
pub fn parse_metadata(raw: &str) -> Metadata {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        _ => {
            let mut map = Metadata::new();
            map.insert("source".to_string(), Value::String(raw.to_string()));
            map
        }
    }
}

/// Read an `id,text,metadata` file.
pub fn read_documents(path: &Path) -> IngestResult<Vec<DocumentRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();

    for row in reader.deserialize::<DocumentRow>() {
        let row = row?;
        records.push(DocumentRecord {
            id: row.id,
            metadata: parse_metadata(&row.metadata),
            text: row.text,
        });
    }

    tracing::info!(path = %path.display(), documents = records.len(), "Read documents file");
    Ok(records)
}

/// Embed every document in `batch_size` chunks, make sure the index exists,
/// then upsert the vectors in batches of the same size.
///
/// `connect_admin` runs only once at least one embedding exists, so an empty
/// file needs no index credentials.
pub async fn upload_docs<A, F>(
    csv_path: &Path,
    options: &UploadOptions,
    embedder: &dyn EmbeddingProvider,
    connect_admin: F,
) -> IngestResult<UploadReport>
where
    A: IndexAdmin,
    F: FnOnce() -> HybridResult<A>,
{
    let records = read_documents(csv_path)?;
    Ok(upload_records(&records, options, embedder, connect_admin).await?)
}

pub async fn upload_records<A, F>(
    records: &[DocumentRecord],
    options: &UploadOptions,
    embedder: &dyn EmbeddingProvider,
    connect_admin: F,
) -> HybridResult<UploadReport>
where
    A: IndexAdmin,
    F: FnOnce() -> HybridResult<A>,
{
    let batch_size = options.batch_size.max(1);
    let mut report = UploadReport {
        documents: records.len(),
        ..Default::default()
    };

    let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(records.len());
    for chunk in records.chunks(batch_size) {
        let texts: Vec<String> = chunk.iter().map(|r| r.text.clone()).collect();
        embeddings.extend(embedder.embed(TextInput::from(texts)).await?);
        tracing::debug!(embedded = embeddings.len(), total = records.len(), "Embedded batch");
    }
    report.embedded = embeddings.len();

    let Some(dimension) = embeddings.first().map(Vec::len) else {
        tracing::info!("No embeddings generated; nothing to upload");
        return Ok(report);
    };

    let admin = connect_admin()?;
    report.created_index = ensure_index(&admin, &options.index_name, dimension).await?;
    let index = admin.index(&options.index_name).await?;

    if options.dry_run {
        tracing::info!(
            index = %options.index_name,
            vectors = records.len(),
            "Dry run: skipping upsert"
        );
        return Ok(report);
    }

    let vectors: Vec<VectorRecord> = records
        .iter()
        .zip(embeddings)
        .map(|(record, values)| VectorRecord {
            id: record.id.clone(),
            values,
            metadata: record.metadata.clone(),
        })
        .collect();

    for batch in vectors.chunks(batch_size) {
        report.upserted += upsert_with_retry(index.as_ref(), batch, options).await?;
        report.batches += 1;
    }

    tracing::info!(
        index = %options.index_name,
        batches = report.batches,
        upserted = report.upserted,
        "Upload complete"
    );
    Ok(report)
}

/// Returns whether the index had to be created.
async fn ensure_index(admin: &dyn IndexAdmin, name: &str, dimension: usize) -> HybridResult<bool> {
    let existing = admin.list_indexes().await?;
    if existing.iter().any(|n| n == name) {
        return Ok(false);
    }
    admin.create_index(name, dimension, IndexMetric::Cosine).await?;
    Ok(true)
}

/// Linear backoff: sleeps `retry_backoff * attempt` between attempts and
/// returns the last error once `retry_max` attempts are spent.
async fn upsert_with_retry(
    index: &dyn VectorIndex,
    batch: &[VectorRecord],
    options: &UploadOptions,
) -> HybridResult<usize> {
    let retry_max = options.retry_max.max(1);
    let mut attempt = 1;

    loop {
        match index.upsert(batch).await {
            Ok(count) => return Ok(count),
            Err(e) if attempt >= retry_max => return Err(e),
            Err(e) => {
                let wait = options.retry_backoff * attempt;
                tracing::warn!(attempt, wait_ms = wait.as_millis() as u64, error = %e, "Upsert failed, retrying");
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
        }
    }
}
