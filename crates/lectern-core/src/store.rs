//! The `OfferingStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `lectern-store-sqlite`). Higher layers (`lectern-api`, `lectern-server`)
//! depend on this abstraction, not on any concrete backend.
//!
//! Every operation that reads and then writes shared state (the approval
//! conflict-check-then-commit, the enrollment capacity-check-then-insert)
//! must execute as a single atomic step per contended resource: concurrent
//! callers observe either none or all of its effects, never an intermediate
//! state. When two approvals race for the same room and overlapping timeslot,
//! exactly one succeeds; the loser observes `RoomConflict` and may resubmit
//! with another room or slot — the store never queues or retries.

use std::{collections::BTreeMap, future::Future};

use uuid::Uuid;

use crate::{
  Result,
  offering::{ClassOffering, NewOffering, OfferingStatus},
  report::{Evaluation, ProgressNote},
  room::{Room, RoomBooking},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Filter for [`OfferingStore::list_offerings`]. Empty filters match all
/// offerings; `subject` matches case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct OfferingQuery {
  pub status:   Option<OfferingStatus>,
  pub tutor_id: Option<String>,
  pub subject:  Option<String>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an offering registry backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`). Domain failures
/// are reported through the crate-wide [`Error`](crate::Error) taxonomy so
/// callers can distinguish them programmatically; backend faults surface as
/// [`Error::Storage`](crate::Error::Storage).
pub trait OfferingStore: Send + Sync {
  // ── Room catalog ──────────────────────────────────────────────────────

  /// Register a room. Fails with `DuplicateRoom` if the id is taken and
  /// `Validation` unless the id is non-empty and the capacity positive.
  fn add_room(
    &self,
    room_id: String,
    capacity: u32,
  ) -> impl Future<Output = Result<Room>> + Send + '_;

  /// Change a room's capacity. Fails with `RoomNotFound` if absent and
  /// `Validation` unless the capacity is positive. Advisory for future
  /// approvals only — existing approvals and enrollments are never
  /// re-checked.
  fn set_capacity(
    &self,
    room_id: String,
    capacity: u32,
  ) -> impl Future<Output = Result<Room>> + Send + '_;

  /// Retrieve a room. Returns `None` if not found.
  fn get_room(
    &self,
    room_id: String,
  ) -> impl Future<Output = Result<Option<Room>>> + Send + '_;

  fn list_rooms(&self) -> impl Future<Output = Result<Vec<Room>>> + Send + '_;

  // ── Offering registry ─────────────────────────────────────────────────

  /// Create a Pending offering with a registry-assigned id. The input must
  /// pass [`NewOffering::validate`].
  fn create_offering(
    &self,
    input: NewOffering,
  ) -> impl Future<Output = Result<ClassOffering>> + Send + '_;

  /// Retrieve an offering with its roster and notes. Returns `None` if not
  /// found.
  fn get_offering(
    &self,
    offering_id: Uuid,
  ) -> impl Future<Output = Result<Option<ClassOffering>>> + Send + '_;

  /// List offerings matching `query`, oldest first.
  fn list_offerings<'a>(
    &'a self,
    query: &'a OfferingQuery,
  ) -> impl Future<Output = Result<Vec<ClassOffering>>> + Send + 'a;

  /// Offering count per subject, across all lifecycle states.
  fn subject_coverage(
    &self,
  ) -> impl Future<Output = Result<BTreeMap<String, u64>>> + Send + '_;

  // ── Approval ──────────────────────────────────────────────────────────

  /// Decide a Pending offering as approved.
  ///
  /// Offline offerings require `room_id` (`RoomRequired`), the room must
  /// exist (`RoomNotFound`), and no approved offering may already book the
  /// room for an overlapping timeslot (`RoomConflict`); on success the
  /// status flip, the room binding, and the booking-index insertion commit
  /// as one atomic step. Online offerings must not name a room
  /// (`UnexpectedRoom`). Re-approving a decided offering always fails with
  /// `InvalidState` — a second approval could name a different room and
  /// corrupt the index.
  fn approve(
    &self,
    offering_id: Uuid,
    room_id: Option<String>,
  ) -> impl Future<Output = Result<ClassOffering>> + Send + '_;

  /// Decide a Pending offering as rejected, with a non-empty reason.
  /// Terminal; no room or booking is ever touched.
  fn reject(
    &self,
    offering_id: Uuid,
    reason: String,
  ) -> impl Future<Output = Result<ClassOffering>> + Send + '_;

  /// The room's current bookings (approved offline offerings), earliest
  /// first. Fails with `RoomNotFound` for an unknown room.
  fn list_bookings(
    &self,
    room_id: String,
  ) -> impl Future<Output = Result<Vec<RoomBooking>>> + Send + '_;

  // ── Enrollment ────────────────────────────────────────────────────────

  /// Enroll a student. Requires an Approved offering (`InvalidState`);
  /// fails with `AlreadyEnrolled` for a current member and
  /// `CapacityExceeded` when an offline offering's roster has reached its
  /// room's capacity. The capacity check and the insertion are one atomic
  /// step with respect to concurrent joins on the same offering.
  fn join(
    &self,
    offering_id: Uuid,
    student_id: String,
  ) -> impl Future<Output = Result<ClassOffering>> + Send + '_;

  /// Withdraw a student. Fails with `NotEnrolled` if absent; otherwise
  /// removes unconditionally — leaving is legal in any lifecycle state and
  /// at any time. The membership history is retained.
  fn leave(
    &self,
    offering_id: Uuid,
    student_id: String,
  ) -> impl Future<Output = Result<ClassOffering>> + Send + '_;

  // ── Annotation log ────────────────────────────────────────────────────

  /// Append a progress note under a store-generated (timestamp, seq) key.
  /// Keys are monotonically non-decreasing per offering and never reused.
  /// Fails with `Forbidden` unless `tutor_id` owns the offering.
  fn add_progress_note(
    &self,
    offering_id: Uuid,
    tutor_id: String,
    content: String,
  ) -> impl Future<Output = Result<ProgressNote>> + Send + '_;

  /// Append an immutable evaluation. Fails with `Forbidden` unless the
  /// student is, or ever was, enrolled in the offering.
  fn add_evaluation(
    &self,
    offering_id: Uuid,
    student_id: String,
    content: String,
  ) -> impl Future<Output = Result<Evaluation>> + Send + '_;

  /// All evaluations for one offering, oldest first. Fails with
  /// `OfferingNotFound` for an unknown offering. Callers surfacing content
  /// to staff must redact via
  /// [`RedactedEvaluation`](crate::report::RedactedEvaluation).
  fn list_evaluations(
    &self,
    offering_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Evaluation>>> + Send + '_;

  /// Every stored evaluation, oldest first (department-chair view).
  fn list_all_evaluations(
    &self,
  ) -> impl Future<Output = Result<Vec<Evaluation>>> + Send + '_;
}
