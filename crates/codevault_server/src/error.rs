//! HTTP error mapping for API handlers.

use crate::AppError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// JSON error response: `{"error": "<message>"}`.
#[derive(Debug)]
pub struct HttpError(pub AppError);

/// Plain-text error response used by endpoints that serve `text/plain`.
#[derive(Debug)]
pub struct PlainHttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl From<AppError> for PlainHttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

/// Map a domain error to its status code and client-facing message.
///
/// Server-side failures are logged here and replaced by a generic message so
/// storage details never reach the client.
pub fn status_and_message(err: &AppError) -> (StatusCode, String) {
    match err {
        AppError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
        AppError::NotFound => (StatusCode::NOT_FOUND, "Paste not found".to_string()),
        AppError::Expired => (StatusCode::GONE, "Paste has expired".to_string()),
        AppError::Database(_) | AppError::Serialization(_) | AppError::StorageMessage(_) => {
            tracing::error!("Request failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = status_and_message(&self.0);
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl IntoResponse for PlainHttpError {
    fn into_response(self) -> Response {
        let (status, message) = status_and_message(&self.0);
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}
