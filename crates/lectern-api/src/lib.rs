//! JSON REST API for Lectern.
//!
//! Exposes an axum [`Router`] backed by any
//! [`lectern_core::store::OfferingStore`]. Identity, TLS, and transport
//! concerns are the caller's responsibility: every request is expected to
//! arrive with upstream-resolved `x-user-id` and `x-user-role` headers.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", lectern_api::api_router(store.clone()))
//! ```

pub mod actor;
pub mod enrollment;
pub mod error;
pub mod offerings;
pub mod reports;
pub mod rooms;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use lectern_core::store::OfferingStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: OfferingStore + 'static,
{
  Router::new()
    // Offerings
    .route(
      "/offerings",
      get(offerings::list::<S>).post(offerings::create::<S>),
    )
    .route("/offerings/{id}", get(offerings::get_one::<S>))
    .route("/offerings/{id}/approve", post(offerings::approve::<S>))
    .route("/offerings/{id}/reject", post(offerings::reject::<S>))
    // Enrollment
    .route("/offerings/{id}/join", post(enrollment::join::<S>))
    .route("/offerings/{id}/leave", post(enrollment::leave::<S>))
    // Annotations
    .route("/offerings/{id}/notes", post(reports::add_note::<S>))
    .route(
      "/offerings/{id}/evaluations",
      get(reports::list_for_offering::<S>).post(reports::add_evaluation::<S>),
    )
    .route("/evaluations", get(reports::list_all::<S>))
    .route("/coverage", get(offerings::coverage::<S>))
    // Rooms
    .route("/rooms", get(rooms::list::<S>).post(rooms::create::<S>))
    .route("/rooms/{id}/capacity", put(rooms::set_capacity::<S>))
    .route("/rooms/{id}/bookings", get(rooms::bookings::<S>))
    .with_state(store)
}

// ─── Integration tests ───────────────────────────────────────────────────────
