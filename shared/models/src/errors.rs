use enigma_config::ConfigError;
use std::fmt;
use thiserror::Error;

/// External service a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Embedding,
    VectorIndex,
    GraphDatabase,
    Generation,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Embedding => "embedding service",
            Backend::VectorIndex => "vector index",
            Backend::GraphDatabase => "graph database",
            Backend::Generation => "generative model",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum HybridError {
    /// A credential or connection parameter was missing when a client was built.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The backend answered with a failure, or the transport failed.
    #[error("{backend} error: {message}")]
    Upstream { backend: Backend, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl HybridError {
    pub fn upstream(backend: Backend, message: impl fmt::Display) -> Self {
        HybridError::Upstream {
            backend,
            message: message.to_string(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, HybridError::Configuration(_))
    }

    pub fn backend(&self) -> Option<Backend> {
        match self {
            HybridError::Upstream { backend, .. } => Some(*backend),
            _ => None,
        }
    }
}

pub type HybridResult<T> = Result<T, HybridError>;
