//! Handlers for the offering lifecycle endpoints.
//!
//! | Method | Path | Role |
//! |--------|------|------|
//! | `POST` | `/offerings` | tutor |
//! | `GET`  | `/offerings` | any authenticated |
//! | `GET`  | `/offerings/:id` | any authenticated |
//! | `POST` | `/offerings/:id/approve` | coordinator |
//! | `POST` | `/offerings/:id/reject` | coordinator |
//! | `GET`  | `/coverage` | coordinator, deptchair |

use std::{collections::BTreeMap, sync::Arc};

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use lectern_core::{
  Error as CoreError,
  offering::{ClassOffering, DeliveryMode, NewOffering, OfferingStatus},
  role::Role,
  store::{OfferingQuery, OfferingStore},
  timeslot::Timeslot,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{actor::Actor, error::ApiError};

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub subject:       String,
  pub delivery_mode: DeliveryMode,
  pub start:         DateTime<Utc>,
  pub end:           DateTime<Utc>,
  pub meeting_link:  Option<String>,
}

/// `POST /offerings` — the actor is the tutor of record.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: OfferingStore,
{
  actor.require(&[Role::Tutor])?;

  let timeslot = Timeslot::new(body.start, body.end)?;
  let offering = store
    .create_offering(NewOffering {
      tutor_id:      actor.user_id,
      subject:       body.subject,
      delivery_mode: body.delivery_mode,
      timeslot,
      meeting_link:  body.meeting_link,
    })
    .await?;

  Ok((StatusCode::CREATED, Json(offering)))
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status:   Option<OfferingStatus>,
  pub tutor_id: Option<String>,
  pub subject:  Option<String>,
}

/// `GET /offerings[?status=...][&tutor_id=...][&subject=...]`
///
/// Serves the coordinator pending queue (`?status=pending`), a tutor's own
/// classes (`?tutor_id=...`), and the student browse view
/// (`?status=approved`).
pub async fn list<S>(
  State(store): State<Arc<S>>,
  _actor: Actor,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ClassOffering>>, ApiError>
where
  S: OfferingStore,
{
  let offerings = store
    .list_offerings(&OfferingQuery {
      status:   params.status,
      tutor_id: params.tutor_id,
      subject:  params.subject,
    })
    .await?;
  Ok(Json(offerings))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /offerings/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  _actor: Actor,
  Path(id): Path<Uuid>,
) -> Result<Json<ClassOffering>, ApiError>
where
  S: OfferingStore,
{
  let offering = store
    .get_offering(id)
    .await?
    .ok_or(CoreError::OfferingNotFound(id))?;
  Ok(Json(offering))
}

// ─── Approve ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ApproveBody {
  pub room_id: Option<String>,
}

/// `POST /offerings/:id/approve` — body: `{"room_id":"A101"}` for offline
/// offerings, `{}` for online ones.
pub async fn approve<S>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Path(id): Path<Uuid>,
  Json(body): Json<ApproveBody>,
) -> Result<Json<ClassOffering>, ApiError>
where
  S: OfferingStore,
{
  actor.require(&[Role::Coordinator])?;
  Ok(Json(store.approve(id, body.room_id).await?))
}

// ─── Reject ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RejectBody {
  pub reason: String,
}

/// `POST /offerings/:id/reject` — body: `{"reason":"..."}`.
pub async fn reject<S>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Path(id): Path<Uuid>,
  Json(body): Json<RejectBody>,
) -> Result<Json<ClassOffering>, ApiError>
where
  S: OfferingStore,
{
  actor.require(&[Role::Coordinator])?;
  Ok(Json(store.reject(id, body.reason).await?))
}

// ─── Coverage ────────────────────────────────────────────────────────────────

/// `GET /coverage` — offering count per subject.
pub async fn coverage<S>(
  State(store): State<Arc<S>>,
  actor: Actor,
) -> Result<Json<BTreeMap<String, u64>>, ApiError>
where
  S: OfferingStore,
{
  actor.require(&[Role::Coordinator, Role::DeptChair])?;
  Ok(Json(store.subject_coverage().await?))
}
