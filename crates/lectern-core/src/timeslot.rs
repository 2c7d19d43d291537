//! Timeslot — the half-open interval `[start, end)` attached to an offering.
//!
//! A timeslot is a plain value embedded in its offering, never shared by
//! reference. There is no recurrence; one offering, one interval.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeslot {
  pub start: DateTime<Utc>,
  pub end:   DateTime<Utc>,
}

impl Timeslot {
  /// Build a timeslot, enforcing `start < end`.
  pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
    if start >= end {
      return Err(Error::Validation(format!(
        "timeslot start {start} is not before end {end}"
      )));
    }
    Ok(Self { start, end })
  }

  /// Half-open overlap test. Back-to-back slots, where one slot's `end`
  /// equals the other's `start`, do not overlap.
  pub fn overlaps(&self, other: &Timeslot) -> bool {
    self.start < other.end && other.start < self.end
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, hour, min, 0).unwrap()
  }

  fn slot(h1: u32, m1: u32, h2: u32, m2: u32) -> Timeslot {
    Timeslot::new(at(h1, m1), at(h2, m2)).unwrap()
  }

  #[test]
  fn new_rejects_empty_and_inverted_intervals() {
    assert!(matches!(
      Timeslot::new(at(10, 0), at(10, 0)),
      Err(Error::Validation(_))
    ));
    assert!(matches!(
      Timeslot::new(at(11, 0), at(10, 0)),
      Err(Error::Validation(_))
    ));
  }

  #[test]
  fn partial_overlap_conflicts() {
    let a = slot(10, 0, 11, 0);
    let b = slot(10, 30, 11, 30);
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
  }

  #[test]
  fn containment_conflicts() {
    let outer = slot(9, 0, 12, 0);
    let inner = slot(10, 0, 11, 0);
    assert!(outer.overlaps(&inner));
    assert!(inner.overlaps(&outer));
  }

  #[test]
  fn back_to_back_does_not_conflict() {
    let a = slot(10, 0, 11, 0);
    let b = slot(11, 0, 12, 0);
    assert!(!a.overlaps(&b));
    assert!(!b.overlaps(&a));
  }

  #[test]
  fn disjoint_does_not_conflict() {
    let a = slot(8, 0, 9, 0);
    let b = slot(14, 0, 15, 0);
    assert!(!a.overlaps(&b));
  }

  #[test]
  fn identical_slots_conflict() {
    let a = slot(10, 0, 11, 0);
    assert!(a.overlaps(&a));
  }
}
