//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use lineup_core::{ErrorKind, store::StoreError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// A store failure, classified by the domain error behind it.
  #[error("{source}")]
  Store {
    kind:   ErrorKind,
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  pub fn store<E: StoreError>(err: E) -> Self {
    let kind = err.domain().map_or(ErrorKind::Internal, lineup_core::Error::kind);
    ApiError::Store { kind, source: Box::new(err) }
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      ApiError::NotFound(_) => ErrorKind::NotFound,
      ApiError::BadRequest(_) => ErrorKind::Validation,
      ApiError::Store { kind, .. } => *kind,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let kind = self.kind();
    let status = match &self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      _ => match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict | ErrorKind::InvalidState => StatusCode::CONFLICT,
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
      },
    };
    if kind == ErrorKind::Internal {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": self.to_string(), "kind": kind }))).into_response()
  }
}
