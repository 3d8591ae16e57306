//! Environment configuration for the hybrid chat services.
//!
//! Nothing here is read at import time. Each client factory calls the
//! matching `from_env` when it is first constructed, so crates load and
//! test cleanly on machines without credentials.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub mod keys {
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    pub const OPENAI_EMBEDDING_MODEL: &str = "OPENAI_EMBEDDING_MODEL";
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";

    pub const PINECONE_API_KEY: &str = "PINECONE_API_KEY";
    pub const PINECONE_INDEX_NAME: &str = "PINECONE_INDEX_NAME";
    pub const PINECONE_ENVIRONMENT: &str = "PINECONE_ENVIRONMENT";
    pub const PINECONE_CLOUD: &str = "PINECONE_CLOUD";
    pub const PINECONE_CONTROLLER_URL: &str = "PINECONE_CONTROLLER_URL";
    pub const PINECONE_INDEX_HOST: &str = "PINECONE_INDEX_HOST";
    pub const PINECONE_NAMESPACE: &str = "PINECONE_NAMESPACE";

    pub const NEO4J_URI: &str = "NEO4J_URI";
    pub const NEO4J_USER: &str = "NEO4J_USER";
    pub const NEO4J_PASSWORD: &str = "NEO4J_PASSWORD";
    pub const NEO4J_DATABASE: &str = "NEO4J_DATABASE";

    pub const HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";

    pub const BATCH_SIZE: &str = "BATCH_SIZE";
    pub const RETRY_MAX: &str = "RETRY_MAX";
    pub const RETRY_BACKOFF: &str = "RETRY_BACKOFF";

    pub const CHAT_HOST: &str = "CHAT_HOST";
    pub const CHAT_PORT: &str = "CHAT_PORT";
    pub const VISUALIZATION_PATH: &str = "VISUALIZATION_PATH";
}

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_PINECONE_CONTROLLER_URL: &str = "https://api.pinecone.io";
pub const DEFAULT_INGEST_INDEX_NAME: &str = "blue-enigma-index";
pub const DEFAULT_VISUALIZATION_PATH: &str = "visualization/neo4j_graph.html";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load a `.env` file from the working directory if one exists.
///
/// Binaries call this once at startup; libraries never do.
pub fn load_dotenv() {
    if let Ok(path) = dotenv::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }
}

/// Read a variable, treating unset and blank values alike.
pub fn optional(key: &'static str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub fn required(key: &'static str) -> ConfigResult<String> {
    optional(key).ok_or(ConfigError::Missing(key))
}

pub fn parse_or<T: FromStr>(key: &'static str, default: T) -> ConfigResult<T> {
    match optional(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

/// Upper bound applied to every outbound backend call.
pub fn http_timeout() -> ConfigResult<Duration> {
    parse_or(keys::HTTP_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS).map(Duration::from_secs)
}

/// The generation/embedding credential. Resolved on every use, never cached.
pub fn openai_api_key() -> ConfigResult<String> {
    required(keys::OPENAI_API_KEY)
}

/// Non-secret OpenAI settings. The API key is deliberately not part of this.
#[derive(Debug, Clone)]
pub struct OpenAiEndpoint {
    pub base_url: String,
    pub embedding_model: String,
    pub chat_model: String,
    pub timeout: Duration,
}

impl OpenAiEndpoint {
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            base_url: optional(keys::OPENAI_BASE_URL)
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            embedding_model: optional(keys::OPENAI_EMBEDDING_MODEL)
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            chat_model: optional(keys::OPENAI_MODEL)
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            timeout: http_timeout()?,
        })
    }
}

#[derive(Clone)]
pub struct PineconeSettings {
    pub api_key: String,
    pub index_name: Option<String>,
    pub environment: Option<String>,
    pub cloud: String,
    pub controller_url: String,
    pub index_host: Option<String>,
    pub namespace: Option<String>,
    pub timeout: Duration,
}

impl PineconeSettings {
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            api_key: required(keys::PINECONE_API_KEY)?,
            index_name: optional(keys::PINECONE_INDEX_NAME),
            environment: optional(keys::PINECONE_ENVIRONMENT),
            cloud: optional(keys::PINECONE_CLOUD).unwrap_or_else(|| "aws".to_string()),
            controller_url: optional(keys::PINECONE_CONTROLLER_URL)
                .unwrap_or_else(|| DEFAULT_PINECONE_CONTROLLER_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            index_host: optional(keys::PINECONE_INDEX_HOST),
            namespace: optional(keys::PINECONE_NAMESPACE),
            timeout: http_timeout()?,
        })
    }

    /// Search needs an explicit index; ingestion falls back to a default name.
    pub fn require_index_name(&self) -> ConfigResult<&str> {
        self.index_name
            .as_deref()
            .ok_or(ConfigError::Missing(keys::PINECONE_INDEX_NAME))
    }
}

impl std::fmt::Debug for PineconeSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeSettings")
            .field("index_name", &self.index_name)
            .field("environment", &self.environment)
            .field("cloud", &self.cloud)
            .field("controller_url", &self.controller_url)
            .field("index_host", &self.index_host)
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct Neo4jSettings {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub timeout: Duration,
}

impl Neo4jSettings {
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            uri: required(keys::NEO4J_URI)?,
            user: required(keys::NEO4J_USER)?,
            password: required(keys::NEO4J_PASSWORD)?,
            database: optional(keys::NEO4J_DATABASE).unwrap_or_else(|| "neo4j".to_string()),
            timeout: http_timeout()?,
        })
    }
}

impl std::fmt::Debug for Neo4jSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Neo4jSettings")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

/// Tunables for the bulk upload job.
#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub batch_size: usize,
    pub retry_max: u32,
    pub retry_backoff: Duration,
    pub index_name: String,
}

impl IngestSettings {
    pub fn from_env() -> ConfigResult<Self> {
        let batch_size: usize = parse_or(keys::BATCH_SIZE, 32)?;
        if batch_size == 0 {
            return Err(ConfigError::Invalid {
                key: keys::BATCH_SIZE,
                value: "0".to_string(),
            });
        }

        let retry_max: u32 = parse_or(keys::RETRY_MAX, 3)?;
        let backoff_secs: f64 = parse_or(keys::RETRY_BACKOFF, 1.0)?;
        if !backoff_secs.is_finite() || backoff_secs < 0.0 {
            return Err(ConfigError::Invalid {
                key: keys::RETRY_BACKOFF,
                value: backoff_secs.to_string(),
            });
        }

        Ok(Self {
            batch_size,
            retry_max: retry_max.max(1),
            retry_backoff: Duration::from_secs_f64(backoff_secs),
            index_name: optional(keys::PINECONE_INDEX_NAME)
                .unwrap_or_else(|| DEFAULT_INGEST_INDEX_NAME.to_string()),
        })
    }
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            batch_size: 32,
            retry_max: 3,
            retry_backoff: Duration::from_secs(1),
            index_name: DEFAULT_INGEST_INDEX_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub visualization_path: String,
}

impl ServerSettings {
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            host: optional(keys::CHAT_HOST).unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(keys::CHAT_PORT, 8090)?,
            visualization_path: optional(keys::VISUALIZATION_PATH)
                .unwrap_or_else(|| DEFAULT_VISUALIZATION_PATH.to_string()),
        })
    }
}
