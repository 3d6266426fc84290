//! API error type, [`axum::response::IntoResponse`] implementation, and the
//! global failure-envelope layer.
//!
//! Every failed request is answered with one JSON shape:
//!
//! ```json
//! {
//!   "success": false,
//!   "error": {
//!     "kind": "not_found",
//!     "code": 404,
//!     "message": "...",
//!     "path": "/card/...",
//!     "timestamp": "2026-08-06T12:00:00+00:00"
//!   }
//! }
//! ```
//!
//! Handlers only know kind and message; the envelope layer fills in the
//! request path and timestamp the handler cannot see.

use axum::{
  Json,
  extract::Request,
  http::StatusCode,
  middleware::Next,
  response::{IntoResponse, Response},
};
use cardex_core::ErrorKind;
use chrono::Utc;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
  pub kind:    ErrorKind,
  pub message: String,
}

impl ApiError {
  pub fn bad_request(message: impl Into<String>) -> Self {
    Self {
      kind:    ErrorKind::InvalidArgument,
      message: message.into(),
    }
  }
}

impl From<cardex_core::Error> for ApiError {
  fn from(err: cardex_core::Error) -> Self {
    Self { kind: err.kind(), message: err.to_string() }
  }
}

impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    Self {
      kind:    ErrorKind::InvalidArgument,
      message: errors.to_string(),
    }
  }
}

fn status_for(kind: ErrorKind) -> StatusCode {
  match kind {
    ErrorKind::NotFound => StatusCode::NOT_FOUND,
    ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
    ErrorKind::Conflict => StatusCode::CONFLICT,
    ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

/// Marker carried from [`ApiError::into_response`] to [`error_envelope`].
#[derive(Debug, Clone)]
struct ErrorMeta {
  kind:    ErrorKind,
  message: String,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = status_for(self.kind);
    tracing::error!(
      kind = self.kind.as_str(),
      status = status.as_u16(),
      "{}",
      self.message
    );

    let meta = ErrorMeta { kind: self.kind, message: self.message };

    // Fallback body in case the envelope layer is not mounted; the layer
    // replaces it with the full envelope.
    let mut response = (
      status,
      Json(json!({
        "success": false,
        "error": {
          "kind": meta.kind.as_str(),
          "code": status.as_u16(),
          "message": meta.message.clone(),
        },
      })),
    )
      .into_response();

    response.extensions_mut().insert(meta);
    response
  }
}

/// Middleware wrapping every failure response in the diagnostic envelope.
pub async fn error_envelope(request: Request, next: Next) -> Response {
  let path = request.uri().path().to_owned();
  let mut response = next.run(request).await;

  let Some(meta) = response.extensions_mut().remove::<ErrorMeta>() else {
    return response;
  };

  let status = response.status();
  (
    status,
    Json(json!({
      "success": false,
      "error": {
        "kind": meta.kind.as_str(),
        "code": status.as_u16(),
        "message": meta.message,
        "path": path,
        "timestamp": Utc::now().to_rfc3339(),
      },
    })),
  )
    .into_response()
}
