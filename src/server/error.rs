//! HTTP error responses.

use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required body field was missing or empty.
    #[error("{0}")]
    Validation(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    /// Store failure, answered with a plain-text message.
    #[error("{message}: {source}")]
    Storage {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    /// Store failure on a JSON endpoint.
    #[error("{message}: {source}")]
    StorageJson {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn storage(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Storage { message, source }
    }

    pub fn storage_json(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::StorageJson { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
            ApiError::Storage { message, source } => {
                tracing::error!("{}: {}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
            ApiError::StorageJson { message, source } => {
                tracing::error!("{}: {}", message, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message })),
                )
                    .into_response()
            }
        }
    }
}
