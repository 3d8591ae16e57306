pub mod graph_service;

pub use graph_service::{GraphRetrievalClient, DEFAULT_GRAPH_LIMIT};
