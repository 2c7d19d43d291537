//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, TimeZone, Utc};
use lectern_core::{
  Error,
  offering::{DeliveryMode, NewOffering, OfferingStatus},
  store::{OfferingQuery, OfferingStore},
  timeslot::Timeslot,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn at(hour: u32, min: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2025, 6, 2, hour, min, 0).unwrap()
}

fn slot(h1: u32, m1: u32, h2: u32, m2: u32) -> Timeslot {
  Timeslot::new(at(h1, m1), at(h2, m2)).unwrap()
}

fn offline(tutor: &str, subject: &str, timeslot: Timeslot) -> NewOffering {
  NewOffering {
    tutor_id:      tutor.into(),
    subject:       subject.into(),
    delivery_mode: DeliveryMode::Offline,
    timeslot,
    meeting_link:  None,
  }
}

fn online(tutor: &str, subject: &str, timeslot: Timeslot) -> NewOffering {
  NewOffering {
    tutor_id:      tutor.into(),
    subject:       subject.into(),
    delivery_mode: DeliveryMode::Online,
    timeslot,
    meeting_link:  Some("https://meet.example/abc".into()),
  }
}

// ─── Room catalog ────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_room() {
  let s = store().await;

  let room = s.add_room("A101".into(), 2).await.unwrap();
  assert_eq!(room.room_id, "A101");
  assert_eq!(room.capacity, 2);

  let fetched = s.get_room("A101".into()).await.unwrap().unwrap();
  assert_eq!(fetched, room);
}

#[tokio::test]
async fn get_room_missing_returns_none() {
  let s = store().await;
  assert!(s.get_room("B4-303".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_room_errors() {
  let s = store().await;
  s.add_room("A101".into(), 2).await.unwrap();

  let err = s.add_room("A101".into(), 5).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateRoom(id) if id == "A101"));
}

#[tokio::test]
async fn add_room_rejects_zero_capacity_and_blank_id() {
  let s = store().await;
  assert!(matches!(
    s.add_room("A101".into(), 0).await.unwrap_err(),
    Error::Validation(_)
  ));
  assert!(matches!(
    s.add_room("  ".into(), 3).await.unwrap_err(),
    Error::Validation(_)
  ));
}

#[tokio::test]
async fn set_capacity_updates_room() {
  let s = store().await;
  s.add_room("A101".into(), 2).await.unwrap();

  let room = s.set_capacity("A101".into(), 10).await.unwrap();
  assert_eq!(room.capacity, 10);

  let fetched = s.get_room("A101".into()).await.unwrap().unwrap();
  assert_eq!(fetched.capacity, 10);
}

#[tokio::test]
async fn set_capacity_unknown_room_errors() {
  let s = store().await;
  let err = s.set_capacity("A101".into(), 10).await.unwrap_err();
  assert!(matches!(err, Error::RoomNotFound(id) if id == "A101"));
}

#[tokio::test]
async fn list_rooms_sorted_by_id() {
  let s = store().await;
  s.add_room("B202".into(), 4).await.unwrap();
  s.add_room("A101".into(), 2).await.unwrap();

  let rooms = s.list_rooms().await.unwrap();
  let ids: Vec<_> = rooms.iter().map(|r| r.room_id.as_str()).collect();
  assert_eq!(ids, ["A101", "B202"]);
}

// ─── Offering registry ───────────────────────────────────────────────────────

#[tokio::test]
async fn create_offering_starts_pending() {
  let s = store().await;

  let offering = s
    .create_offering(online("tut-001", "Linear Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();

  assert_eq!(offering.status, OfferingStatus::Pending);
  assert_eq!(offering.tutor_id, "tut-001");
  assert!(offering.room_id.is_none());
  assert!(offering.rejection_reason.is_none());
  assert!(offering.enrolled_students.is_empty());
  assert!(offering.progress_notes.is_empty());

  let fetched = s.get_offering(offering.offering_id).await.unwrap().unwrap();
  assert_eq!(fetched.offering_id, offering.offering_id);
  assert_eq!(fetched.subject, "Linear Algebra");
  assert_eq!(fetched.timeslot, offering.timeslot);
  assert_eq!(fetched.meeting_link.as_deref(), Some("https://meet.example/abc"));
}

#[tokio::test]
async fn create_offering_validates_input() {
  let s = store().await;

  let mut missing_link = online("tut-001", "Algebra", slot(10, 0, 11, 0));
  missing_link.meeting_link = None;
  assert!(matches!(
    s.create_offering(missing_link).await.unwrap_err(),
    Error::Validation(_)
  ));

  let mut linked_offline = offline("tut-001", "Algebra", slot(10, 0, 11, 0));
  linked_offline.meeting_link = Some("https://meet.example/abc".into());
  assert!(matches!(
    s.create_offering(linked_offline).await.unwrap_err(),
    Error::Validation(_)
  ));
}

#[tokio::test]
async fn get_offering_missing_returns_none() {
  let s = store().await;
  assert!(s.get_offering(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_offerings_filters() {
  let s = store().await;
  s.add_room("A101".into(), 2).await.unwrap();

  let a = s
    .create_offering(offline("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();
  s.create_offering(online("tut-002", "Chemistry", slot(10, 0, 11, 0)))
    .await
    .unwrap();
  s.approve(a.offering_id, Some("A101".into())).await.unwrap();

  let pending = s
    .list_offerings(&OfferingQuery {
      status: Some(OfferingStatus::Pending),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(pending.len(), 1);
  assert_eq!(pending[0].subject, "Chemistry");

  let mine = s
    .list_offerings(&OfferingQuery {
      tutor_id: Some("tut-001".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(mine.len(), 1);
  assert_eq!(mine[0].offering_id, a.offering_id);

  let by_subject = s
    .list_offerings(&OfferingQuery {
      subject: Some("algebra".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_subject.len(), 1);

  let all = s.list_offerings(&OfferingQuery::default()).await.unwrap();
  assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn subject_coverage_counts_all_states() {
  let s = store().await;

  s.create_offering(online("tut-001", "Algebra", slot(9, 0, 10, 0)))
    .await
    .unwrap();
  s.create_offering(online("tut-002", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();
  let rejected = s
    .create_offering(online("tut-003", "Chemistry", slot(11, 0, 12, 0)))
    .await
    .unwrap();
  s.reject(rejected.offering_id, "no demand".into()).await.unwrap();

  let coverage = s.subject_coverage().await.unwrap();
  assert_eq!(coverage.get("Algebra"), Some(&2));
  assert_eq!(coverage.get("Chemistry"), Some(&1));
}

// ─── Approval ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn approve_online_without_room() {
  let s = store().await;
  let offering = s
    .create_offering(online("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();

  let approved = s.approve(offering.offering_id, None).await.unwrap();
  assert_eq!(approved.status, OfferingStatus::Approved);
  assert!(approved.room_id.is_none());
  assert_eq!(approved.meeting_link.as_deref(), Some("https://meet.example/abc"));
}

#[tokio::test]
async fn approve_online_with_room_errors() {
  let s = store().await;
  s.add_room("A101".into(), 2).await.unwrap();
  let offering = s
    .create_offering(online("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();

  let err = s
    .approve(offering.offering_id, Some("A101".into()))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UnexpectedRoom));

  // The failed approval left the offering untouched.
  let fetched = s.get_offering(offering.offering_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, OfferingStatus::Pending);
}

#[tokio::test]
async fn approve_offline_requires_room() {
  let s = store().await;
  let offering = s
    .create_offering(offline("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();

  let err = s.approve(offering.offering_id, None).await.unwrap_err();
  assert!(matches!(err, Error::RoomRequired));
}

#[tokio::test]
async fn approve_offline_unknown_room_errors() {
  let s = store().await;
  let offering = s
    .create_offering(offline("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();

  let err = s
    .approve(offering.offering_id, Some("B4-303".into()))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::RoomNotFound(id) if id == "B4-303"));
}

#[tokio::test]
async fn approve_offline_binds_room_and_registers_booking() {
  let s = store().await;
  s.add_room("A101".into(), 2).await.unwrap();
  let offering = s
    .create_offering(offline("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();

  let approved = s
    .approve(offering.offering_id, Some("A101".into()))
    .await
    .unwrap();
  assert_eq!(approved.status, OfferingStatus::Approved);
  assert_eq!(approved.room_id.as_deref(), Some("A101"));

  let bookings = s.list_bookings("A101".into()).await.unwrap();
  assert_eq!(bookings.len(), 1);
  assert_eq!(bookings[0].offering_id, offering.offering_id);
  assert_eq!(bookings[0].timeslot, offering.timeslot);
}

#[tokio::test]
async fn overlapping_booking_conflicts_back_to_back_does_not() {
  let s = store().await;
  s.add_room("A101".into(), 2).await.unwrap();

  let x = s
    .create_offering(offline("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();
  let y = s
    .create_offering(offline("tut-002", "Chemistry", slot(10, 30, 11, 30)))
    .await
    .unwrap();
  let z = s
    .create_offering(offline("tut-003", "Physics", slot(11, 0, 12, 0)))
    .await
    .unwrap();

  s.approve(x.offering_id, Some("A101".into())).await.unwrap();

  let err = s
    .approve(y.offering_id, Some("A101".into()))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::RoomConflict { ref room, other } if room == "A101" && other == x.offering_id
  ));

  // The losing offering stays Pending and may resubmit elsewhere.
  let y_after = s.get_offering(y.offering_id).await.unwrap().unwrap();
  assert_eq!(y_after.status, OfferingStatus::Pending);

  // Back-to-back with X: no overlap under half-open semantics.
  let z_approved = s.approve(z.offering_id, Some("A101".into())).await.unwrap();
  assert_eq!(z_approved.status, OfferingStatus::Approved);

  let bookings = s.list_bookings("A101".into()).await.unwrap();
  assert_eq!(bookings.len(), 2);
}

#[tokio::test]
async fn same_slot_in_different_rooms_is_legal() {
  let s = store().await;
  s.add_room("A101".into(), 2).await.unwrap();
  s.add_room("B202".into(), 2).await.unwrap();

  let a = s
    .create_offering(offline("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();
  let b = s
    .create_offering(offline("tut-002", "Chemistry", slot(10, 0, 11, 0)))
    .await
    .unwrap();

  s.approve(a.offering_id, Some("A101".into())).await.unwrap();
  s.approve(b.offering_id, Some("B202".into())).await.unwrap();
}

#[tokio::test]
async fn approve_twice_is_invalid_state() {
  let s = store().await;
  let offering = s
    .create_offering(online("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();

  s.approve(offering.offering_id, None).await.unwrap();
  let err = s.approve(offering.offering_id, None).await.unwrap_err();
  assert!(matches!(
    err,
    Error::InvalidState { status: OfferingStatus::Approved, .. }
  ));
}

#[tokio::test]
async fn approve_unknown_offering_errors() {
  let s = store().await;
  let err = s.approve(Uuid::new_v4(), None).await.unwrap_err();
  assert!(matches!(err, Error::OfferingNotFound(_)));
}

#[tokio::test]
async fn reject_records_reason_and_is_terminal() {
  let s = store().await;
  let offering = s
    .create_offering(offline("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();

  let rejected = s
    .reject(offering.offering_id, "schedule conflict".into())
    .await
    .unwrap();
  assert_eq!(rejected.status, OfferingStatus::Rejected);
  assert_eq!(rejected.rejection_reason.as_deref(), Some("schedule conflict"));

  let err = s.approve(offering.offering_id, None).await.unwrap_err();
  assert!(matches!(
    err,
    Error::InvalidState { status: OfferingStatus::Rejected, .. }
  ));
}

#[tokio::test]
async fn reject_requires_non_empty_reason() {
  let s = store().await;
  let offering = s
    .create_offering(online("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();

  let err = s.reject(offering.offering_id, "  ".into()).await.unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn rejected_offering_never_occupies_the_index() {
  let s = store().await;
  s.add_room("A101".into(), 2).await.unwrap();

  let offering = s
    .create_offering(offline("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();
  s.reject(offering.offering_id, "no demand".into()).await.unwrap();

  assert!(s.list_bookings("A101".into()).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_bookings_unknown_room_errors() {
  let s = store().await;
  let err = s.list_bookings("A101".into()).await.unwrap_err();
  assert!(matches!(err, Error::RoomNotFound(_)));
}

// ─── Enrollment ──────────────────────────────────────────────────────────────

async fn approved_offline(s: &SqliteStore, capacity: u32) -> Uuid {
  s.add_room("A101".into(), capacity).await.unwrap();
  let offering = s
    .create_offering(offline("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();
  s.approve(offering.offering_id, Some("A101".into())).await.unwrap();
  offering.offering_id
}

#[tokio::test]
async fn join_requires_approved_offering() {
  let s = store().await;
  let pending = s
    .create_offering(online("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();

  let err = s.join(pending.offering_id, "stu-001".into()).await.unwrap_err();
  assert!(matches!(
    err,
    Error::InvalidState { status: OfferingStatus::Pending, .. }
  ));
}

#[tokio::test]
async fn join_unknown_offering_errors() {
  let s = store().await;
  let err = s.join(Uuid::new_v4(), "stu-001".into()).await.unwrap_err();
  assert!(matches!(err, Error::OfferingNotFound(_)));
}

#[tokio::test]
async fn capacity_bounds_offline_joins() {
  let s = store().await;
  let id = approved_offline(&s, 2).await;

  let after_s1 = s.join(id, "stu-001".into()).await.unwrap();
  assert_eq!(after_s1.enrolled_students, ["stu-001"]);

  let err = s.join(id, "stu-001".into()).await.unwrap_err();
  assert!(matches!(err, Error::AlreadyEnrolled { ref student, .. } if student == "stu-001"));

  let after_s2 = s.join(id, "stu-002".into()).await.unwrap();
  assert_eq!(after_s2.enrolled_students, ["stu-001", "stu-002"]);

  let err = s.join(id, "stu-003".into()).await.unwrap_err();
  assert!(matches!(
    err,
    Error::CapacityExceeded { ref room, capacity: 2 } if room == "A101"
  ));
}

#[tokio::test]
async fn leave_then_rejoin_round_trips() {
  let s = store().await;
  let id = approved_offline(&s, 2).await;

  s.join(id, "stu-001".into()).await.unwrap();
  let after_leave = s.leave(id, "stu-001".into()).await.unwrap();
  assert!(after_leave.enrolled_students.is_empty());

  let after_rejoin = s.join(id, "stu-001".into()).await.unwrap();
  assert_eq!(after_rejoin.enrolled_students, ["stu-001"]);
}

#[tokio::test]
async fn leave_without_membership_errors() {
  let s = store().await;
  let id = approved_offline(&s, 2).await;

  let err = s.leave(id, "stu-001".into()).await.unwrap_err();
  assert!(matches!(err, Error::NotEnrolled { ref student, .. } if student == "stu-001"));
}

#[tokio::test]
async fn online_offerings_have_no_capacity_bound() {
  let s = store().await;
  let offering = s
    .create_offering(online("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();
  s.approve(offering.offering_id, None).await.unwrap();

  for i in 0..10 {
    s.join(offering.offering_id, format!("stu-{i:03}")).await.unwrap();
  }
  let fetched = s.get_offering(offering.offering_id).await.unwrap().unwrap();
  assert_eq!(fetched.enrolled_students.len(), 10);
}

#[tokio::test]
async fn capacity_raise_admits_more_students() {
  let s = store().await;
  let id = approved_offline(&s, 1).await;

  s.join(id, "stu-001".into()).await.unwrap();
  assert!(matches!(
    s.join(id, "stu-002".into()).await.unwrap_err(),
    Error::CapacityExceeded { .. }
  ));

  s.set_capacity("A101".into(), 2).await.unwrap();
  s.join(id, "stu-002".into()).await.unwrap();
}

// ─── Annotation log ──────────────────────────────────────────────────────────

#[tokio::test]
async fn progress_notes_append_in_key_order() {
  let s = store().await;
  let offering = s
    .create_offering(online("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();

  let first = s
    .add_progress_note(offering.offering_id, "tut-001".into(), "fractions".into())
    .await
    .unwrap();
  let second = s
    .add_progress_note(offering.offering_id, "tut-001".into(), "decimals".into())
    .await
    .unwrap();

  // Keys never collide and never go backwards.
  assert_ne!(first.key(), second.key());
  assert!((second.recorded_at, second.seq) > (first.recorded_at, first.seq));

  let fetched = s.get_offering(offering.offering_id).await.unwrap().unwrap();
  let contents: Vec<_> = fetched
    .progress_notes
    .iter()
    .map(|n| n.content.as_str())
    .collect();
  assert_eq!(contents, ["fractions", "decimals"]);
}

#[tokio::test]
async fn progress_note_by_other_tutor_is_forbidden() {
  let s = store().await;
  let offering = s
    .create_offering(online("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();

  let err = s
    .add_progress_note(offering.offering_id, "tut-002".into(), "notes".into())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));
}

#[tokio::test]
async fn progress_note_rejects_empty_content() {
  let s = store().await;
  let offering = s
    .create_offering(online("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();

  let err = s
    .add_progress_note(offering.offering_id, "tut-001".into(), " ".into())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn evaluation_requires_past_or_present_enrollment() {
  let s = store().await;
  let id = approved_offline(&s, 2).await;

  let err = s
    .add_evaluation(id, "stu-001".into(), "great class".into())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));
}

#[tokio::test]
async fn evaluation_after_leaving_is_allowed() {
  let s = store().await;
  let id = approved_offline(&s, 2).await;

  s.join(id, "stu-001".into()).await.unwrap();
  s.leave(id, "stu-001".into()).await.unwrap();

  let evaluation = s
    .add_evaluation(id, "stu-001".into(), "clear explanations".into())
    .await
    .unwrap();
  assert_eq!(evaluation.student_id, "stu-001");
  assert_eq!(evaluation.tutor_id, "tut-001");

  let listed = s.list_evaluations(id).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].content, "clear explanations");
}

#[tokio::test]
async fn list_evaluations_unknown_offering_errors() {
  let s = store().await;
  let err = s.list_evaluations(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::OfferingNotFound(_)));
}

#[tokio::test]
async fn list_all_evaluations_spans_offerings() {
  let s = store().await;

  let a = s
    .create_offering(online("tut-001", "Algebra", slot(10, 0, 11, 0)))
    .await
    .unwrap();
  let b = s
    .create_offering(online("tut-002", "Chemistry", slot(12, 0, 13, 0)))
    .await
    .unwrap();
  s.approve(a.offering_id, None).await.unwrap();
  s.approve(b.offering_id, None).await.unwrap();
  s.join(a.offering_id, "stu-001".into()).await.unwrap();
  s.join(b.offering_id, "stu-001".into()).await.unwrap();

  s.add_evaluation(a.offering_id, "stu-001".into(), "good".into())
    .await
    .unwrap();
  s.add_evaluation(b.offering_id, "stu-001".into(), "better".into())
    .await
    .unwrap();

  let all = s.list_all_evaluations().await.unwrap();
  assert_eq!(all.len(), 2);
}
