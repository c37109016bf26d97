use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::annotator::AnnotationError;
use crate::matching::embedder::EmbeddingError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Multipart(e) => (e.status(), "MULTIPART_ERROR", e.body_text()),
            AppError::Embedding(e) => {
                tracing::error!("Embedding error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EMBEDDING_ERROR",
                    "A model inference error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Why a single resume was dropped from a batch.
///
/// None of these abort the batch: the screening pipeline records the failure
/// against the upload and moves on to the next file.
#[derive(Debug, Error)]
pub enum ExtractionFailure {
    #[error("Unsupported file format '{0}'. Please provide a PDF or DOCX file")]
    UnsupportedFormat(String),

    #[error("Failed to extract text from the document: {0}")]
    Extraction(String),

    #[error("No text could be extracted from the document")]
    EmptyInput,

    #[error("Linguistic annotation failed: {0}")]
    Annotation(#[from] AnnotationError),
}

impl ExtractionFailure {
    /// Stable, machine-readable tag used in batch failure reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionFailure::UnsupportedFormat(_) => "unsupported_format",
            ExtractionFailure::Extraction(_) => "extraction",
            ExtractionFailure::EmptyInput => "empty_input",
            ExtractionFailure::Annotation(_) => "annotation",
        }
    }
}
