//! Error taxonomy for the offering workflow.
//!
//! Every variant is distinguishable programmatically; [`Error::kind`] is the
//! stable discriminant surfaced over the wire. Nothing here is retried by the
//! core — retry policy (e.g. re-approving with another room after a
//! `RoomConflict`) belongs to the caller.

use thiserror::Error;
use uuid::Uuid;

use crate::offering::OfferingStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("offering not found: {0}")]
  OfferingNotFound(Uuid),

  #[error("room not found: {0:?}")]
  RoomNotFound(String),

  #[error("room already exists: {0:?}")]
  DuplicateRoom(String),

  /// The operation is not legal for the offering's current lifecycle state.
  /// Covers both re-deciding a decided offering and joining a non-approved
  /// one.
  #[error("offering {offering} is {status}; operation not legal in this state")]
  InvalidState {
    offering: Uuid,
    status:   OfferingStatus,
  },

  #[error("offline offerings require a room assignment")]
  RoomRequired,

  #[error("online offerings do not take a room assignment")]
  UnexpectedRoom,

  /// The room is already booked by another approved offering whose timeslot
  /// overlaps.
  #[error("room {room:?} is already booked by offering {other}")]
  RoomConflict { room: String, other: Uuid },

  #[error("room {room:?} is full (capacity {capacity})")]
  CapacityExceeded { room: String, capacity: u32 },

  #[error("student {student:?} is already enrolled in offering {offering}")]
  AlreadyEnrolled { offering: Uuid, student: String },

  #[error("student {student:?} is not enrolled in offering {offering}")]
  NotEnrolled { offering: Uuid, student: String },

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("validation failed: {0}")]
  Validation(String),

  /// A backend fault: I/O, database, or a corrupted stored row.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend fault as [`Error::Storage`].
  pub fn storage(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
    Self::Storage(err.into())
  }

  /// The stable wire discriminant for this error kind.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::OfferingNotFound(_) => "not_found",
      Self::RoomNotFound(_) => "room_not_found",
      Self::DuplicateRoom(_) => "duplicate_room",
      Self::InvalidState { .. } => "invalid_state",
      Self::RoomRequired => "room_required",
      Self::UnexpectedRoom => "unexpected_room",
      Self::RoomConflict { .. } => "room_conflict",
      Self::CapacityExceeded { .. } => "capacity_exceeded",
      Self::AlreadyEnrolled { .. } => "already_enrolled",
      Self::NotEnrolled { .. } => "not_enrolled",
      Self::Forbidden(_) => "forbidden",
      Self::Validation(_) => "validation",
      Self::Storage(_) => "storage",
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
