use anyhow::Context;
use clap::Parser;
use embedding::OpenAiEmbeddingClient;
use enigma_config::IngestSettings;
use enigma_observability::{init_tracing, TracingConfig};
use ingest::cli::UploaderArgs;
use ingest::{upload_docs, UploadOptions};
use vector_rag::PineconeClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    enigma_config::load_dotenv();
    init_tracing(TracingConfig::for_service("pinecone-uploader"));

    let args = UploaderArgs::parse();

    let settings = IngestSettings::from_env().context("invalid ingestion settings")?;
    let options = UploadOptions::from_settings(&settings, args.dry_run);
    let embedder = OpenAiEmbeddingClient::from_env()?;

    tracing::info!(
        csv = %args.csv.display(),
        index = %options.index_name,
        batch_size = options.batch_size,
        dry_run = options.dry_run,
        "Starting document upload"
    );

    let report = upload_docs(&args.csv, &options, &embedder, PineconeClient::from_env)
        .await
        .with_context(|| format!("upload from {} failed", args.csv.display()))?;

    if options.dry_run {
        println!(
            "Dry run: would upsert {} vectors to index {}",
            report.embedded, options.index_name
        );
    } else {
        println!(
            "Uploaded {} vectors to index {} in {} batches",
            report.upserted, options.index_name, report.batches
        );
    }
    Ok(())
}
