//! Handlers for progress notes and evaluations.
//!
//! | Method | Path | Role |
//! |--------|------|------|
//! | `POST` | `/offerings/:id/notes` | tutor (owner, enforced by the store) |
//! | `POST` | `/offerings/:id/evaluations` | student (must be or have been enrolled) |
//! | `GET`  | `/offerings/:id/evaluations` | tutor, coordinator, deptchair |
//! | `GET`  | `/evaluations` | deptchair |
//!
//! Every read path that surfaces evaluation content to staff goes through
//! [`RedactedEvaluation`] — the author's identity never leaves the store in
//! those responses.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use lectern_core::{
  report::{Evaluation, ProgressNote, RedactedEvaluation},
  role::Role,
  store::OfferingStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{actor::Actor, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ContentBody {
  pub content: String,
}

// ─── Progress notes ──────────────────────────────────────────────────────────

/// `POST /offerings/:id/notes` — body: `{"content":"..."}`.
pub async fn add_note<S>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Path(id): Path<Uuid>,
  Json(body): Json<ContentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: OfferingStore,
{
  actor.require(&[Role::Tutor])?;
  let note: ProgressNote =
    store.add_progress_note(id, actor.user_id, body.content).await?;
  Ok((StatusCode::CREATED, Json(note)))
}

// ─── Evaluations ─────────────────────────────────────────────────────────────

/// `POST /offerings/:id/evaluations` — body: `{"content":"..."}`. The
/// response echoes the stored record to its author only.
pub async fn add_evaluation<S>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Path(id): Path<Uuid>,
  Json(body): Json<ContentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: OfferingStore,
{
  actor.require(&[Role::Student])?;
  let evaluation: Evaluation =
    store.add_evaluation(id, actor.user_id, body.content).await?;
  Ok((StatusCode::CREATED, Json(evaluation)))
}

/// `GET /offerings/:id/evaluations`
pub async fn list_for_offering<S>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<RedactedEvaluation>>, ApiError>
where
  S: OfferingStore,
{
  actor.require(&[Role::Tutor, Role::Coordinator, Role::DeptChair])?;
  let evaluations = store.list_evaluations(id).await?;
  Ok(Json(
    evaluations.into_iter().map(RedactedEvaluation::from).collect(),
  ))
}

/// `GET /evaluations` — the department-chair view across all offerings.
pub async fn list_all<S>(
  State(store): State<Arc<S>>,
  actor: Actor,
) -> Result<Json<Vec<RedactedEvaluation>>, ApiError>
where
  S: OfferingStore,
{
  actor.require(&[Role::DeptChair])?;
  let evaluations = store.list_all_evaluations().await?;
  Ok(Json(
    evaluations.into_iter().map(RedactedEvaluation::from).collect(),
  ))
}
