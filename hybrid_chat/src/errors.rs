use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use enigma_models::HybridError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error(transparent)]
    Pipeline(#[from] HybridError),

    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("Graph visualization not found at {0}")]
    VisualizationMissing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResponseError for ChatError {
    fn status_code(&self) -> StatusCode {
        match self {
            ChatError::Pipeline(HybridError::Configuration(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ChatError::Pipeline(HybridError::Upstream { .. }) => StatusCode::BAD_GATEWAY,
            ChatError::Pipeline(HybridError::InvalidArgument(_)) | ChatError::EmptyQuery => StatusCode::BAD_REQUEST,
            ChatError::VisualizationMissing(_) => StatusCode::NOT_FOUND,
            ChatError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
