//! Extractors whose rejections use the API error shape.

use axum::{
  Json,
  extract::{FromRequest, FromRequestParts, Path, Request},
  http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Like [`axum::Json`], but a malformed body is a `400` with an
/// `{"error": ...}` body instead of axum's plain-text rejection.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state)
      .await
      .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(JsonBody(value))
  }
}

/// Like [`axum::extract::Path`] for resource ids. An id that does not parse
/// cannot name anything, so it is a `404` rather than axum's plain-text `400`.
pub struct PathId<T>(pub T);

impl<T, S> FromRequestParts<S> for PathId<T>
where
  T: DeserializeOwned + Send,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Path(value) = Path::<T>::from_request_parts(parts, state).await.map_err(|rejection| {
      tracing::debug!(uri = %parts.uri, %rejection, "unparseable resource id");
      ApiError::NotFound("Not found.".to_string())
    })?;
    Ok(PathId(value))
  }
}
