//! Class offerings and their lifecycle.
//!
//! An offering is created Pending by a tutor, then decided exactly once by a
//! coordinator: Approved (offline offerings gain a room binding) or Rejected
//! (with a reason). Decided offerings are terminal and are never deleted —
//! rejected ones remain as an auditable record.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, report::ProgressNote, timeslot::Timeslot};

// ─── Enums ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
  /// Virtual delivery via a meeting link.
  Online,
  /// Physical delivery in a room assigned at approval time.
  Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferingStatus {
  Pending,
  Approved,
  Rejected,
}

impl OfferingStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Approved => "approved",
      Self::Rejected => "rejected",
    }
  }
}

impl fmt::Display for OfferingStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── ClassOffering ───────────────────────────────────────────────────────────

/// A scheduled class instance.
///
/// Field invariants, upheld by the store:
/// - `meeting_link` is present iff `delivery_mode` is online.
/// - `room_id` is present iff the offering is approved and offline.
/// - `rejection_reason` is present iff the offering is rejected.
/// - Status moves Pending → {Approved, Rejected} and never out again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassOffering {
  pub offering_id:       Uuid,
  pub tutor_id:          String,
  pub subject:           String,
  pub delivery_mode:     DeliveryMode,
  pub timeslot:          Timeslot,
  pub meeting_link:      Option<String>,
  pub room_id:           Option<String>,
  pub status:            OfferingStatus,
  pub rejection_reason:  Option<String>,
  /// Currently enrolled students, in join order. Membership only — a set,
  /// not an owned entity.
  pub enrolled_students: Vec<String>,
  /// Tutor progress notes, ordered by their (timestamp, seq) key.
  pub progress_notes:    Vec<ProgressNote>,
  pub created_at:        DateTime<Utc>,
}

// ─── NewOffering ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::OfferingStore::create_offering`].
/// The offering id, Pending status, and `created_at` are assigned by the
/// store; they are not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewOffering {
  pub tutor_id:      String,
  pub subject:       String,
  pub delivery_mode: DeliveryMode,
  pub timeslot:      Timeslot,
  pub meeting_link:  Option<String>,
}

impl NewOffering {
  /// Cross-field rules that a field-by-field deserialise cannot express.
  pub fn validate(&self) -> Result<()> {
    if self.subject.trim().is_empty() {
      return Err(Error::Validation("subject must not be empty".into()));
    }
    if self.timeslot.start >= self.timeslot.end {
      return Err(Error::Validation(format!(
        "timeslot start {} is not before end {}",
        self.timeslot.start, self.timeslot.end
      )));
    }
    match (self.delivery_mode, &self.meeting_link) {
      (DeliveryMode::Online, None) => Err(Error::Validation(
        "online offerings require a meeting link".into(),
      )),
      (DeliveryMode::Offline, Some(_)) => Err(Error::Validation(
        "offline offerings do not take a meeting link".into(),
      )),
      _ => Ok(()),
    }
  }
}
