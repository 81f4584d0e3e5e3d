//! API error type and [`axum::response::IntoResponse`] implementation.

use agency_core::store::StoreError;
use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a store error: rule violations become client errors, anything else
  /// is a server fault.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    match e.rule() {
      Some(rule) => rule.clone().into(),
      None => ApiError::Store(Box::new(e)),
    }
  }
}

impl From<agency_core::Error> for ApiError {
  fn from(e: agency_core::Error) -> Self {
    if e.is_not_found() {
      ApiError::NotFound(e.to_string())
    } else {
      ApiError::BadRequest(e.to_string())
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.".to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn store_failures_hide_their_detail() {
    let err = ApiError::Store("disk I/O error at /var/lib/agency.sqlite3".into());
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "Internal server error." }));
  }
}
