//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Error kinds surfaced by the HTTP handlers.
///
/// Client-facing variants carry their message to the caller. Server-side
/// failures keep their source chain for the log and answer with a generic
/// message only.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    ServiceUnavailable(&'static str),

    #[error("{0}")]
    NotFound(String),

    #[error("Translation failed")]
    Translation(#[source] anyhow::Error),

    #[error("Transcription failed")]
    Transcription(#[source] anyhow::Error),

    #[error("Speech synthesis failed")]
    Synthesis(#[source] anyhow::Error),

    #[error("Storage error")]
    Storage(#[from] std::io::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Translation(_)
            | AppError::Transcription(_)
            | AppError::Synthesis(_)
            | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match &self {
                AppError::Translation(e) | AppError::Transcription(e) | AppError::Synthesis(e) => {
                    error!("{}: {:#}", self, e);
                }
                AppError::Storage(e) => error!("{}: {}", self, e),
                _ => error!("{}", self),
            }
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
