//! Handlers for joining and leaving offerings.
//!
//! The acting student is taken from the identity headers; the body carries
//! nothing.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use lectern_core::{offering::ClassOffering, role::Role, store::OfferingStore};
use uuid::Uuid;

use crate::{actor::Actor, error::ApiError};

/// `POST /offerings/:id/join`
pub async fn join<S>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Path(id): Path<Uuid>,
) -> Result<Json<ClassOffering>, ApiError>
where
  S: OfferingStore,
{
  actor.require(&[Role::Student])?;
  Ok(Json(store.join(id, actor.user_id).await?))
}

/// `POST /offerings/:id/leave`
pub async fn leave<S>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Path(id): Path<Uuid>,
) -> Result<Json<ClassOffering>, ApiError>
where
  S: OfferingStore,
{
  actor.require(&[Role::Student])?;
  Ok(Json(store.leave(id, actor.user_id).await?))
}
