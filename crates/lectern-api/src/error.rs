//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body is `{"error": {"kind": "...", "message": "..."}}`; the
//! `kind` string is the stable discriminant callers branch on (e.g. retrying
//! an approval with another room after `room_conflict`).

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use lectern_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Identity headers absent — the upstream session resolver did not run.
  #[error("missing identity headers")]
  Unauthorized,

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The actor's role may not perform this operation.
  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error(transparent)]
  Domain(#[from] CoreError),
}

fn domain_status(err: &CoreError) -> StatusCode {
  match err {
    CoreError::OfferingNotFound(_) | CoreError::RoomNotFound(_) => {
      StatusCode::NOT_FOUND
    }
    CoreError::DuplicateRoom(_)
    | CoreError::InvalidState { .. }
    | CoreError::RoomConflict { .. }
    | CoreError::CapacityExceeded { .. }
    | CoreError::AlreadyEnrolled { .. }
    | CoreError::NotEnrolled { .. } => StatusCode::CONFLICT,
    CoreError::RoomRequired
    | CoreError::UnexpectedRoom
    | CoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
    CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
    CoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, kind, message) = match &self {
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "unauthorized", self.to_string())
      }
      ApiError::BadRequest(_) => {
        (StatusCode::BAD_REQUEST, "bad_request", self.to_string())
      }
      ApiError::Forbidden(_) => {
        (StatusCode::FORBIDDEN, "forbidden", self.to_string())
      }
      ApiError::Domain(e) => {
        if matches!(e, CoreError::Storage(_)) {
          tracing::error!(error = %e, "store failure");
        }
        (domain_status(e), e.kind(), e.to_string())
      }
    };

    (
      status,
      Json(json!({ "error": { "kind": kind, "message": message } })),
    )
      .into_response()
  }
}
