use anyhow::Context;
use clap::Parser;
use enigma_config::Neo4jSettings;
use enigma_observability::{init_tracing, TracingConfig};
use graph_rag::Neo4jClient;
use ingest::cli::LoaderArgs;
use ingest::{load_locations, visualize_graph, DEFAULT_VISUALIZATION_LIMIT};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    enigma_config::load_dotenv();
    init_tracing(TracingConfig::for_service("neo4j-loader"));

    let args = LoaderArgs::parse();

    let settings = Neo4jSettings::from_env().context("invalid Neo4j settings")?;
    let client = Neo4jClient::connect(&settings).await?;

    let loaded = load_locations(&args.csv, &client)
        .await
        .with_context(|| format!("loading {} failed", args.csv.display()))?;
    println!("Loaded {} locations into Neo4j", loaded);

    if args.visualize {
        let summary = visualize_graph(&client, &args.out, DEFAULT_VISUALIZATION_LIMIT).await?;
        println!(
            "Graph visualization ({} nodes, {} edges) written to {}",
            summary.nodes,
            summary.edges,
            args.out.display()
        );
    }
    Ok(())
}
