//! Command line arguments for the two loader binaries.

use clap::Parser;
use enigma_config::DEFAULT_VISUALIZATION_PATH;
use std::path::PathBuf;

pub const DEFAULT_DOCS_CSV: &str = "data/docs.csv";
pub const DEFAULT_LOCATIONS_CSV: &str = "data/locations.csv";

/// Embed documents and upload them to Pinecone
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "pinecone-uploader", long_about = None)]
pub struct UploaderArgs {
    /// Documents CSV with id,text,metadata columns
    #[arg(long, default_value = DEFAULT_DOCS_CSV)]
    pub csv: PathBuf,

    /// Compute embeddings and ensure the index, but upload nothing
    #[arg(long)]
    pub dry_run: bool,
}

/// Load locations into Neo4j and optionally export a visualization
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "neo4j-loader", long_about = None)]
pub struct LoaderArgs {
    /// Locations CSV with id,name,lat,lon[,description][,tags] columns
    #[arg(long, default_value = DEFAULT_LOCATIONS_CSV)]
    pub csv: PathBuf,

    /// Write an HTML view of the location graph after loading
    #[arg(long)]
    pub visualize: bool,

    /// Visualization output
    #[arg(long, default_value = DEFAULT_VISUALIZATION_PATH)]
    pub out: PathBuf,
}
