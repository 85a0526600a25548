//! API error type and [`axum::response::IntoResponse`] implementation.

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

  /// The store could not answer. Reads are idempotent, so the caller may
  /// retry.
  #[error("store unavailable: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("export failed: {0}")]
  Export(#[from] csv::Error),
}

impl ApiError {
  /// Classify a store error by the core error anywhere in its source chain.
  pub fn from_store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    let classified = std::iter::successors(
      Some(&e as &(dyn std::error::Error + 'static)),
      |err| err.source(),
    )
    .find_map(|err| err.downcast_ref::<lawdash_core::Error>())
    .and_then(|core| match core {
      lawdash_core::Error::InvalidPage { .. } => Some(ApiError::NotFound(core.to_string())),
      lawdash_core::Error::InvalidPageRequest(_) | lawdash_core::Error::InvalidFilter(_) => {
        Some(ApiError::BadRequest(core.to_string()))
      }
      _ => None,
    });

    classified.unwrap_or_else(|| ApiError::Store(Box::new(e)))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
      tracing::warn!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
