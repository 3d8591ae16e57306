//! Hybrid retrieval-augmented answering for location and travel questions.
//!
//! [`HybridChat`] is the entry point: it pulls supporting documents from the
//! vector index and location facts from the graph, renders them into one
//! grounded prompt, and asks the generative model for an answer.

pub mod cache;
pub mod errors;
pub mod evidence;
pub mod handlers;
pub mod llm;
pub mod orchestrator;
pub mod prompt;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{CachedRetrieval, QueryCache};
pub use errors::ChatError;
pub use evidence::Evidence;
pub use llm::{ChatMessage, ChatModel, ChatRequest, ChatRole, OpenAiChatClient};
pub use orchestrator::HybridChat;
pub use prompt::compose;
