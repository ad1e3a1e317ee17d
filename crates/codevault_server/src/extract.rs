//! Request extractors.

use crate::error::HttpError;
use crate::AppError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

/// `Json<T>` that reports body rejections as [`AppError::Validation`], so
/// malformed or non-JSON bodies get the usual `{"error": ...}` 400 response.
pub struct AppJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|err| {
            tracing::debug!("Rejected request body: {}", err);
            AppError::Validation(err.body_text())
        })?;
        Ok(Self(value))
    }
}
