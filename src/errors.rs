use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{records::RecordError, storage::StorageError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("File too large")]
    PayloadTooLarge,
    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Failed to upload file")]
    Storage(#[from] StorageError),
    #[error("Failed to save gallery item")]
    Record(#[source] RecordError),
    #[error("Failed to fetch gallery items")]
    List(#[source] RecordError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Multipart(e) => e.status(),
            ApiError::Storage(_) | ApiError::Record(_) | ApiError::List(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // upstream causes stay in the log, clients only see the generic message
        match &self {
            ApiError::Storage(e) => tracing::error!(error = %e, "file upload failed"),
            ApiError::Record(e) => tracing::error!(error = %e, "saving gallery item failed"),
            ApiError::List(e) => tracing::error!(error = %e, "listing gallery items failed"),
            ApiError::Multipart(e) => tracing::warn!(error = %e, "rejected multipart body"),
            _ => {}
        }

        let body = match self {
            ApiError::Multipart(e) => e.body_text(),
            other => other.to_string(),
        };

        (status, Json(json!({ "error": body }))).into_response()
    }
}
