//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-precision RFC 3339 strings (microseconds,
//! `Z` suffix) so lexicographic `ORDER BY` matches chronological order.
//! UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use lectern_core::{
  Error, Result,
  offering::{ClassOffering, DeliveryMode, OfferingStatus},
  report::{Evaluation, ProgressNote},
  room::RoomBooking,
  timeslot::Timeslot,
};
use uuid::Uuid;

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Uuid::parse_str(s).map_err(|e| Error::storage(format!("bad uuid {s:?}: {e}")))
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::storage(format!("bad timestamp {s:?}: {e}")))
}

/// The current instant, truncated to the stored (microsecond) precision so
/// timestamps compare identically before and after a round-trip.
pub fn now_micros() -> DateTime<Utc> {
  let now = Utc::now();
  DateTime::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now)
}

// ─── DeliveryMode ────────────────────────────────────────────────────────────

pub fn encode_mode(m: DeliveryMode) -> &'static str {
  match m {
    DeliveryMode::Online => "online",
    DeliveryMode::Offline => "offline",
  }
}

pub fn decode_mode(s: &str) -> Result<DeliveryMode> {
  match s {
    "online" => Ok(DeliveryMode::Online),
    "offline" => Ok(DeliveryMode::Offline),
    other => Err(Error::storage(format!("unknown delivery mode: {other:?}"))),
  }
}

// ─── OfferingStatus ──────────────────────────────────────────────────────────

pub fn encode_status(s: OfferingStatus) -> &'static str { s.as_str() }

pub fn decode_status(s: &str) -> Result<OfferingStatus> {
  match s {
    "pending" => Ok(OfferingStatus::Pending),
    "approved" => Ok(OfferingStatus::Approved),
    "rejected" => Ok(OfferingStatus::Rejected),
    other => Err(Error::storage(format!("unknown status: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `offerings` row.
pub struct RawOffering {
  pub offering_id:      String,
  pub tutor_id:         String,
  pub subject:          String,
  pub delivery_mode:    String,
  pub slot_start:       String,
  pub slot_end:         String,
  pub meeting_link:     Option<String>,
  pub room_id:          Option<String>,
  pub status:           String,
  pub rejection_reason: Option<String>,
  pub created_at:       String,
}

impl RawOffering {
  pub fn status(&self) -> Result<OfferingStatus> { decode_status(&self.status) }

  pub fn delivery_mode(&self) -> Result<DeliveryMode> {
    decode_mode(&self.delivery_mode)
  }

  pub fn timeslot(&self) -> Result<Timeslot> {
    Ok(Timeslot {
      start: decode_dt(&self.slot_start)?,
      end:   decode_dt(&self.slot_end)?,
    })
  }

  /// Assemble the full read model from the row plus its roster and notes.
  pub fn into_offering(
    self,
    enrolled_students: Vec<String>,
    notes: Vec<RawNote>,
  ) -> Result<ClassOffering> {
    let timeslot = self.timeslot()?;
    let progress_notes = notes
      .into_iter()
      .map(RawNote::into_note)
      .collect::<Result<Vec<_>>>()?;

    Ok(ClassOffering {
      offering_id: decode_uuid(&self.offering_id)?,
      tutor_id: self.tutor_id,
      subject: self.subject,
      delivery_mode: decode_mode(&self.delivery_mode)?,
      timeslot,
      meeting_link: self.meeting_link,
      room_id: self.room_id,
      status: decode_status(&self.status)?,
      rejection_reason: self.rejection_reason,
      enrolled_students,
      progress_notes,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `progress_notes` row.
pub struct RawNote {
  pub recorded_at: String,
  pub seq:         u32,
  pub content:     String,
}

impl RawNote {
  pub fn into_note(self) -> Result<ProgressNote> {
    Ok(ProgressNote {
      recorded_at: decode_dt(&self.recorded_at)?,
      seq:         self.seq,
      content:     self.content,
    })
  }
}

/// Raw strings read directly from an `evaluations` row.
pub struct RawEvaluation {
  pub evaluation_id: String,
  pub offering_id:   String,
  pub tutor_id:      String,
  pub student_id:    String,
  pub content:       String,
  pub recorded_at:   String,
}

impl RawEvaluation {
  pub fn into_evaluation(self) -> Result<Evaluation> {
    Ok(Evaluation {
      evaluation_id: decode_uuid(&self.evaluation_id)?,
      offering_id:   decode_uuid(&self.offering_id)?,
      tutor_id:      self.tutor_id,
      student_id:    self.student_id,
      content:       self.content,
      recorded_at:   decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw strings read directly from a `room_bookings` row.
pub struct RawBooking {
  pub offering_id: String,
  pub room_id:     String,
  pub slot_start:  String,
  pub slot_end:    String,
}

impl RawBooking {
  pub fn into_booking(self) -> Result<RoomBooking> {
    Ok(RoomBooking {
      offering_id: decode_uuid(&self.offering_id)?,
      room_id:     self.room_id,
      timeslot:    Timeslot {
        start: decode_dt(&self.slot_start)?,
        end:   decode_dt(&self.slot_end)?,
      },
    })
  }
}
