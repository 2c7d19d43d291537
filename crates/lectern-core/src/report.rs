//! Progress notes and evaluations — the free-text artifacts that attach to an
//! offering over its lifetime.
//!
//! Both are append-only. Notes are keyed by a store-generated
//! (timestamp, seq) pair so a same-instant collision can never silently
//! overwrite an earlier note. Evaluations are immutable once stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Progress notes ──────────────────────────────────────────────────────────

/// A tutor's note on the delivery of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressNote {
  /// Store-assigned; monotonically non-decreasing per offering.
  pub recorded_at: DateTime<Utc>,
  /// Disambiguates notes recorded at the same instant. 0 for the first.
  pub seq:         u32,
  pub content:     String,
}

impl ProgressNote {
  /// Stable display key: the timestamp, with a `#seq` suffix when the
  /// instant collided with an earlier note.
  pub fn key(&self) -> String {
    if self.seq == 0 {
      self.recorded_at.to_rfc3339()
    } else {
      format!("{}#{}", self.recorded_at.to_rfc3339(), self.seq)
    }
  }
}

// ─── Evaluations ─────────────────────────────────────────────────────────────

/// A student's evaluation of a class. Stored externally to the offering,
/// keyed by offering id; never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
  pub evaluation_id: Uuid,
  pub offering_id:   Uuid,
  pub tutor_id:      String,
  /// Retained for authorization only. Must never cross a read boundary
  /// towards tutors, coordinators, or department chairs — see
  /// [`RedactedEvaluation`].
  pub student_id:    String,
  pub content:       String,
  pub recorded_at:   DateTime<Utc>,
}

/// The only shape in which evaluation content may be surfaced to staff
/// readers: everything except the author's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactedEvaluation {
  pub evaluation_id: Uuid,
  pub offering_id:   Uuid,
  pub tutor_id:      String,
  pub content:       String,
  pub recorded_at:   DateTime<Utc>,
}

impl From<Evaluation> for RedactedEvaluation {
  fn from(e: Evaluation) -> Self {
    Self {
      evaluation_id: e.evaluation_id,
      offering_id:   e.offering_id,
      tutor_id:      e.tutor_id,
      content:       e.content,
      recorded_at:   e.recorded_at,
    }
  }
}
