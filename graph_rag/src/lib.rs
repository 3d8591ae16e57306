//! Location graph access: the Neo4j client and the keyword search used to
//! answer queries.

pub mod graph_db;
pub mod services;

pub use graph_db::{GraphConnector, GraphStore, Neo4jClient, Neo4jConnector};
pub use services::{GraphRetrievalClient, DEFAULT_GRAPH_LIMIT};
