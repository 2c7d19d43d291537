//! Physical rooms and their booking records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, timeslot::Timeslot};

/// A physical room. `capacity` bounds enrollment for offerings approved into
/// the room; it is advisory for future approvals only — raising or lowering
/// it never retroactively invalidates an existing approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
  pub room_id:  String,
  pub capacity: u32,
}

impl Room {
  /// Build a room, enforcing a non-empty id and a positive capacity.
  pub fn new(room_id: String, capacity: u32) -> Result<Self> {
    if room_id.trim().is_empty() {
      return Err(Error::Validation("room id must not be empty".into()));
    }
    validate_capacity(capacity)?;
    Ok(Self { room_id, capacity })
  }
}

pub fn validate_capacity(capacity: u32) -> Result<()> {
  if capacity == 0 {
    return Err(Error::Validation("room capacity must be positive".into()));
  }
  Ok(())
}

/// One entry of the timeslot index: an approved offline offering occupying
/// `room_id` for its timeslot. Pending and rejected offerings never appear
/// here; entries are written only inside the approval commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomBooking {
  pub offering_id: Uuid,
  pub room_id:     String,
  pub timeslot:    Timeslot,
}
