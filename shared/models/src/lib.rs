//! Types shared across the retrieval, generation and ingestion crates.

pub mod errors;
pub mod records;

pub use errors::{Backend, HybridError, HybridResult};
pub use records::*;
