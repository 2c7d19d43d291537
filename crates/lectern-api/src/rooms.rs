//! Handlers for `/rooms` — the room catalog.
//!
//! | Method | Path | Role |
//! |--------|------|------|
//! | `GET`  | `/rooms` | coordinator, admin, deptchair |
//! | `POST` | `/rooms` | admin |
//! | `PUT`  | `/rooms/:id/capacity` | admin |
//! | `GET`  | `/rooms/:id/bookings` | coordinator, admin |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use lectern_core::{
  role::Role,
  room::{Room, RoomBooking},
  store::OfferingStore,
};
use serde::Deserialize;

use crate::{actor::Actor, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /rooms`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  actor: Actor,
) -> Result<Json<Vec<Room>>, ApiError>
where
  S: OfferingStore,
{
  actor.require(&[Role::Coordinator, Role::Admin, Role::DeptChair])?;
  Ok(Json(store.list_rooms().await?))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// The one canonical room shape. Anything else is rejected, never guessed.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBody {
  pub room_id:  String,
  pub capacity: u32,
}

/// `POST /rooms` — body: `{"room_id":"A101","capacity":30}`.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: OfferingStore,
{
  actor.require(&[Role::Admin])?;
  let room = store.add_room(body.room_id, body.capacity).await?;
  Ok((StatusCode::CREATED, Json(room)))
}

// ─── Set capacity ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapacityBody {
  pub capacity: u32,
}

/// `PUT /rooms/:id/capacity` — body: `{"capacity":25}`. Advisory for future
/// approvals only; existing approvals and enrollments stay untouched.
pub async fn set_capacity<S>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Path(room_id): Path<String>,
  Json(body): Json<CapacityBody>,
) -> Result<Json<Room>, ApiError>
where
  S: OfferingStore,
{
  actor.require(&[Role::Admin])?;
  Ok(Json(store.set_capacity(room_id, body.capacity).await?))
}

// ─── Bookings ────────────────────────────────────────────────────────────────

/// `GET /rooms/:id/bookings` — the room's approved offline schedule.
pub async fn bookings<S>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Path(room_id): Path<String>,
) -> Result<Json<Vec<RoomBooking>>, ApiError>
where
  S: OfferingStore,
{
  actor.require(&[Role::Coordinator, Role::Admin])?;
  Ok(Json(store.list_bookings(room_id).await?))
}
