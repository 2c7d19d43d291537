//! Actor extraction from the identity headers.
//!
//! The upstream session resolver authenticates the caller and forwards the
//! outcome as `x-user-id` and `x-user-role`. The API consumes both as opaque
//! claims; it never authenticates anyone itself. The acting user id is what
//! handlers use as the tutor/student id — it is never trusted from a request
//! body.

use axum::{extract::FromRequestParts, http::request::Parts};
use lectern_core::role::Role;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone)]
pub struct Actor {
  pub user_id: String,
  pub role:    Role,
}

impl Actor {
  /// Gate an operation on the actor's role.
  pub fn require(&self, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&self.role) {
      Ok(())
    } else {
      Err(ApiError::Forbidden(format!(
        "role {} may not perform this operation",
        self.role.as_str()
      )))
    }
  }
}

impl<S> FromRequestParts<S> for Actor
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    let header = |name: &str| {
      parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
    };

    let user_id = header(USER_ID_HEADER).ok_or(ApiError::Unauthorized)?;
    let role_str = header(USER_ROLE_HEADER).ok_or(ApiError::Unauthorized)?;
    if user_id.trim().is_empty() {
      return Err(ApiError::Unauthorized);
    }
    let role = role_str
      .parse::<Role>()
      .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(Actor { user_id, role })
  }
}
