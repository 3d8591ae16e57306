//! Text to vector adapter over an external embedding service.

pub mod models;
pub mod services;

pub use models::TextInput;
pub use services::{EmbeddingProvider, OpenAiEmbeddingClient};
