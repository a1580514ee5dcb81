use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM API error: {0}")]
    Llm(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Knowledge base not ready: {0}")]
    NotReady(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the caller can fix the condition (bad input, missing itinerary,
    /// embeddings not generated yet) as opposed to a failure on our side.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidRequest(_) | AppError::NotFound(_) | AppError::NotReady(_)
        )
    }

    /// Fold a failure of an external step into `Internal`, keeping the
    /// detail for logs only. Client errors pass through unchanged.
    pub fn into_internal(self, step: &str) -> AppError {
        match self {
            AppError::Internal(_) => self,
            e if e.is_client_error() => e,
            e => AppError::Internal(format!("{} failed: {}", step, e)),
        }
    }
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Llm(ref e) => {
                tracing::error!("LLM API error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Tokenizer(ref e) => {
                tracing::error!("Tokenizer error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.as_str()),
            AppError::NotFound(ref e) => (StatusCode::NOT_FOUND, e.as_str()),
            AppError::NotReady(ref e) => {
                tracing::info!("Knowledge base not ready: {}", e);
                (StatusCode::CONFLICT, e.as_str())
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
