//! Offline loaders: embed a documents file into the vector index, load a
//! locations file into the graph, and export the graph as an HTML page.

pub mod cli;
pub mod documents;
pub mod errors;
pub mod locations;
pub mod visualize;

pub use documents::{parse_metadata, read_documents, upload_docs, upload_records, UploadOptions, UploadReport};
pub use errors::{IngestError, IngestResult};
pub use locations::{load_locations, read_locations};
pub use visualize::{render_html, visualize_graph, GraphSummary, DEFAULT_VISUALIZATION_LIMIT};
