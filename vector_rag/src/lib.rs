//! Vector index access: the Pinecone REST client used by ingestion and the
//! retrieval client used to answer queries.

pub mod models;
pub mod services;

pub use models::{IndexMetric, IndexStats, QueryMatch, VectorRecord};
pub use services::{
    IndexAdmin, IndexConnector, PineconeClient, PineconeConnector, PineconeIndex, VectorIndex,
    VectorRetrievalClient,
};
