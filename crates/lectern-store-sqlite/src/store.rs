//! [`SqliteStore`] — the SQLite implementation of [`OfferingStore`].
//!
//! Each trait method ships one closure to the connection's worker thread;
//! closures run strictly one at a time, so a check-then-commit body is a
//! critical section. Multi-statement bodies additionally run inside an
//! explicit transaction: a mid-body failure rolls back and leaves no partial
//! state.

use std::{collections::BTreeMap, path::Path};

use rusqlite::{Connection, OptionalExtension as _, params};
use uuid::Uuid;

use lectern_core::{
  Error, Result,
  offering::{ClassOffering, DeliveryMode, NewOffering, OfferingStatus},
  report::{Evaluation, ProgressNote},
  room::{Room, RoomBooking, validate_capacity},
  store::{OfferingQuery, OfferingStore},
};

use crate::{
  encode::{
    RawBooking, RawEvaluation, RawNote, RawOffering, decode_dt, encode_dt,
    encode_mode, encode_status, encode_uuid, now_micros,
  },
  schema::SCHEMA,
};

/// Map a database fault into the domain's storage error.
fn db<T>(r: rusqlite::Result<T>) -> Result<T> { r.map_err(Error::storage) }

// ─── Store ───────────────────────────────────────────────────────────────────

/// An offering registry backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(Error::storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(Error::storage)
  }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────

fn offering_row(
  conn: &Connection,
  id_str: &str,
) -> rusqlite::Result<Option<RawOffering>> {
  conn
    .query_row(
      "SELECT offering_id, tutor_id, subject, delivery_mode, slot_start,
              slot_end, meeting_link, room_id, status, rejection_reason,
              created_at
       FROM offerings WHERE offering_id = ?1",
      params![id_str],
      |row| {
        Ok(RawOffering {
          offering_id:      row.get(0)?,
          tutor_id:         row.get(1)?,
          subject:          row.get(2)?,
          delivery_mode:    row.get(3)?,
          slot_start:       row.get(4)?,
          slot_end:         row.get(5)?,
          meeting_link:     row.get(6)?,
          room_id:          row.get(7)?,
          status:           row.get(8)?,
          rejection_reason: row.get(9)?,
          created_at:       row.get(10)?,
        })
      },
    )
    .optional()
}

fn room_row(conn: &Connection, room_id: &str) -> rusqlite::Result<Option<Room>> {
  conn
    .query_row(
      "SELECT room_id, capacity FROM rooms WHERE room_id = ?1",
      params![room_id],
      |row| {
        Ok(Room {
          room_id:  row.get(0)?,
          capacity: row.get(1)?,
        })
      },
    )
    .optional()
}

/// Currently enrolled students, in join order.
fn roster(conn: &Connection, id_str: &str) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare(
    "SELECT student_id FROM enrollments
     WHERE offering_id = ?1 AND left_at IS NULL
     ORDER BY joined_at, enrollment_id",
  )?;
  stmt
    .query_map(params![id_str], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<_>>>()
}

fn note_rows(conn: &Connection, id_str: &str) -> rusqlite::Result<Vec<RawNote>> {
  let mut stmt = conn.prepare(
    "SELECT recorded_at, seq, content FROM progress_notes
     WHERE offering_id = ?1 ORDER BY recorded_at, seq",
  )?;
  stmt
    .query_map(params![id_str], |row| {
      Ok(RawNote {
        recorded_at: row.get(0)?,
        seq:         row.get(1)?,
        content:     row.get(2)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()
}

fn booking_rows(
  conn: &Connection,
  room_id: &str,
  excluding: &str,
) -> rusqlite::Result<Vec<RawBooking>> {
  let mut stmt = conn.prepare(
    "SELECT offering_id, room_id, slot_start, slot_end FROM room_bookings
     WHERE room_id = ?1 AND offering_id != ?2 ORDER BY slot_start",
  )?;
  stmt
    .query_map(params![room_id, excluding], |row| {
      Ok(RawBooking {
        offering_id: row.get(0)?,
        room_id:     row.get(1)?,
        slot_start:  row.get(2)?,
        slot_end:    row.get(3)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()
}

/// The active enrollment row id for (offering, student), if any.
fn active_enrollment(
  conn: &Connection,
  id_str: &str,
  student_id: &str,
) -> rusqlite::Result<Option<String>> {
  conn
    .query_row(
      "SELECT enrollment_id FROM enrollments
       WHERE offering_id = ?1 AND student_id = ?2 AND left_at IS NULL
       LIMIT 1",
      params![id_str, student_id],
      |row| row.get(0),
    )
    .optional()
}

/// Whether the student is, or ever was, enrolled in the offering.
fn ever_enrolled(
  conn: &Connection,
  id_str: &str,
  student_id: &str,
) -> rusqlite::Result<bool> {
  let hit: Option<i64> = conn
    .query_row(
      "SELECT 1 FROM enrollments
       WHERE offering_id = ?1 AND student_id = ?2 LIMIT 1",
      params![id_str, student_id],
      |row| row.get(0),
    )
    .optional()?;
  Ok(hit.is_some())
}

fn enrolled_count(conn: &Connection, id_str: &str) -> rusqlite::Result<u32> {
  conn.query_row(
    "SELECT COUNT(*) FROM enrollments
     WHERE offering_id = ?1 AND left_at IS NULL",
    params![id_str],
    |row| row.get(0),
  )
}

/// Assemble the full read model for one offering row.
fn materialize(conn: &Connection, raw: RawOffering) -> Result<ClassOffering> {
  let enrolled = db(roster(conn, &raw.offering_id))?;
  let notes = db(note_rows(conn, &raw.offering_id))?;
  raw.into_offering(enrolled, notes)
}

/// Materialize an offering that is known to the caller; absence is an error.
fn load_offering(
  conn: &Connection,
  id_str: &str,
  offering_id: Uuid,
) -> Result<ClassOffering> {
  let raw =
    db(offering_row(conn, id_str))?.ok_or(Error::OfferingNotFound(offering_id))?;
  materialize(conn, raw)
}

// ─── Room catalog transactions ───────────────────────────────────────────────

fn add_room_tx(conn: &mut Connection, room: Room) -> Result<Room> {
  let tx = db(conn.transaction())?;
  if db(room_row(&tx, &room.room_id))?.is_some() {
    return Err(Error::DuplicateRoom(room.room_id));
  }
  db(tx.execute(
    "INSERT INTO rooms (room_id, capacity) VALUES (?1, ?2)",
    params![room.room_id, room.capacity],
  ))?;
  db(tx.commit())?;
  Ok(room)
}

fn set_capacity_tx(
  conn: &mut Connection,
  room_id: String,
  capacity: u32,
) -> Result<Room> {
  let tx = db(conn.transaction())?;
  let changed = db(tx.execute(
    "UPDATE rooms SET capacity = ?2 WHERE room_id = ?1",
    params![room_id, capacity],
  ))?;
  if changed == 0 {
    return Err(Error::RoomNotFound(room_id));
  }
  db(tx.commit())?;
  Ok(Room { room_id, capacity })
}

// ─── Approval transactions ───────────────────────────────────────────────────

fn approve_tx(
  conn: &mut Connection,
  offering_id: Uuid,
  room_id: Option<String>,
) -> Result<ClassOffering> {
  let id_str = encode_uuid(offering_id);
  let tx = db(conn.transaction())?;

  let raw =
    db(offering_row(&tx, &id_str))?.ok_or(Error::OfferingNotFound(offering_id))?;
  let status = raw.status()?;
  if status != OfferingStatus::Pending {
    return Err(Error::InvalidState { offering: offering_id, status });
  }

  match raw.delivery_mode()? {
    DeliveryMode::Offline => {
      let room_id = room_id.ok_or(Error::RoomRequired)?;
      let room = db(room_row(&tx, &room_id))?
        .ok_or_else(|| Error::RoomNotFound(room_id.clone()))?;

      let slot = raw.timeslot()?;
      for raw_booking in db(booking_rows(&tx, &room.room_id, &id_str))? {
        let booking = raw_booking.into_booking()?;
        if slot.overlaps(&booking.timeslot) {
          return Err(Error::RoomConflict {
            room:  room.room_id,
            other: booking.offering_id,
          });
        }
      }

      // Status flip, room binding, and index insertion commit together.
      db(tx.execute(
        "UPDATE offerings SET status = 'approved', room_id = ?2
         WHERE offering_id = ?1",
        params![id_str, room.room_id],
      ))?;
      db(tx.execute(
        "INSERT INTO room_bookings (offering_id, room_id, slot_start, slot_end)
         VALUES (?1, ?2, ?3, ?4)",
        params![id_str, room.room_id, raw.slot_start, raw.slot_end],
      ))?;
    }
    DeliveryMode::Online => {
      if room_id.is_some() {
        return Err(Error::UnexpectedRoom);
      }
      db(tx.execute(
        "UPDATE offerings SET status = 'approved' WHERE offering_id = ?1",
        params![id_str],
      ))?;
    }
  }

  let approved = load_offering(&tx, &id_str, offering_id)?;
  db(tx.commit())?;
  Ok(approved)
}

fn reject_tx(
  conn: &mut Connection,
  offering_id: Uuid,
  reason: String,
) -> Result<ClassOffering> {
  let id_str = encode_uuid(offering_id);
  let tx = db(conn.transaction())?;

  let raw =
    db(offering_row(&tx, &id_str))?.ok_or(Error::OfferingNotFound(offering_id))?;
  let status = raw.status()?;
  if status != OfferingStatus::Pending {
    return Err(Error::InvalidState { offering: offering_id, status });
  }

  db(tx.execute(
    "UPDATE offerings SET status = 'rejected', rejection_reason = ?2
     WHERE offering_id = ?1",
    params![id_str, reason],
  ))?;

  let rejected = load_offering(&tx, &id_str, offering_id)?;
  db(tx.commit())?;
  Ok(rejected)
}

// ─── Enrollment transactions ─────────────────────────────────────────────────

fn join_tx(
  conn: &mut Connection,
  offering_id: Uuid,
  student_id: String,
) -> Result<ClassOffering> {
  let id_str = encode_uuid(offering_id);
  let tx = db(conn.transaction())?;

  let raw =
    db(offering_row(&tx, &id_str))?.ok_or(Error::OfferingNotFound(offering_id))?;
  let status = raw.status()?;
  if status != OfferingStatus::Approved {
    return Err(Error::InvalidState { offering: offering_id, status });
  }
  if db(active_enrollment(&tx, &id_str, &student_id))?.is_some() {
    return Err(Error::AlreadyEnrolled { offering: offering_id, student: student_id });
  }

  if raw.delivery_mode()? == DeliveryMode::Offline {
    let room_id = raw.room_id.clone().ok_or_else(|| {
      Error::storage(format!(
        "approved offline offering {offering_id} has no room binding"
      ))
    })?;
    let room =
      db(room_row(&tx, &room_id))?.ok_or(Error::RoomNotFound(room_id))?;
    if db(enrolled_count(&tx, &id_str))? >= room.capacity {
      return Err(Error::CapacityExceeded {
        room:     room.room_id,
        capacity: room.capacity,
      });
    }
  }

  db(tx.execute(
    "INSERT INTO enrollments (enrollment_id, offering_id, student_id, joined_at)
     VALUES (?1, ?2, ?3, ?4)",
    params![
      encode_uuid(Uuid::new_v4()),
      id_str,
      student_id,
      encode_dt(now_micros()),
    ],
  ))?;

  let joined = load_offering(&tx, &id_str, offering_id)?;
  db(tx.commit())?;
  Ok(joined)
}

fn leave_tx(
  conn: &mut Connection,
  offering_id: Uuid,
  student_id: String,
) -> Result<ClassOffering> {
  let id_str = encode_uuid(offering_id);
  let tx = db(conn.transaction())?;

  if db(offering_row(&tx, &id_str))?.is_none() {
    return Err(Error::OfferingNotFound(offering_id));
  }
  let enrollment_id = db(active_enrollment(&tx, &id_str, &student_id))?
    .ok_or(Error::NotEnrolled { offering: offering_id, student: student_id })?;

  db(tx.execute(
    "UPDATE enrollments SET left_at = ?2 WHERE enrollment_id = ?1",
    params![enrollment_id, encode_dt(now_micros())],
  ))?;

  let left = load_offering(&tx, &id_str, offering_id)?;
  db(tx.commit())?;
  Ok(left)
}

// ─── Annotation transactions ─────────────────────────────────────────────────

fn note_tx(
  conn: &mut Connection,
  offering_id: Uuid,
  tutor_id: String,
  content: String,
) -> Result<ProgressNote> {
  let id_str = encode_uuid(offering_id);
  let tx = db(conn.transaction())?;

  let raw =
    db(offering_row(&tx, &id_str))?.ok_or(Error::OfferingNotFound(offering_id))?;
  if raw.tutor_id != tutor_id {
    return Err(Error::Forbidden(format!(
      "tutor {tutor_id:?} does not own offering {offering_id}"
    )));
  }

  // Key generation: the note timestamp is monotonically non-decreasing per
  // offering; a same-instant collision gets the next seq instead of
  // overwriting.
  let last: Option<(String, u32)> = db(
    tx.query_row(
      "SELECT recorded_at, seq FROM progress_notes
       WHERE offering_id = ?1 ORDER BY recorded_at DESC, seq DESC LIMIT 1",
      params![id_str],
      |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional(),
  )?;

  let now = now_micros();
  let (recorded_at, seq) = match last {
    Some((last_at_str, last_seq)) => {
      let last_at = decode_dt(&last_at_str)?;
      if now > last_at { (now, 0) } else { (last_at, last_seq + 1) }
    }
    None => (now, 0),
  };

  db(tx.execute(
    "INSERT INTO progress_notes (offering_id, recorded_at, seq, content)
     VALUES (?1, ?2, ?3, ?4)",
    params![id_str, encode_dt(recorded_at), seq, content],
  ))?;
  db(tx.commit())?;

  Ok(ProgressNote { recorded_at, seq, content })
}

fn evaluation_tx(
  conn: &mut Connection,
  offering_id: Uuid,
  student_id: String,
  content: String,
) -> Result<Evaluation> {
  let id_str = encode_uuid(offering_id);
  let tx = db(conn.transaction())?;

  let raw =
    db(offering_row(&tx, &id_str))?.ok_or(Error::OfferingNotFound(offering_id))?;
  if !db(ever_enrolled(&tx, &id_str, &student_id))? {
    return Err(Error::Forbidden(format!(
      "student {student_id:?} was never enrolled in offering {offering_id}"
    )));
  }

  let evaluation = Evaluation {
    evaluation_id: Uuid::new_v4(),
    offering_id,
    tutor_id: raw.tutor_id,
    student_id,
    content,
    recorded_at: now_micros(),
  };

  db(tx.execute(
    "INSERT INTO evaluations
       (evaluation_id, offering_id, tutor_id, student_id, content, recorded_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      encode_uuid(evaluation.evaluation_id),
      id_str,
      evaluation.tutor_id,
      evaluation.student_id,
      evaluation.content,
      encode_dt(evaluation.recorded_at),
    ],
  ))?;
  db(tx.commit())?;

  Ok(evaluation)
}

// ─── Read queries ────────────────────────────────────────────────────────────

fn list_rooms_q(conn: &Connection) -> Result<Vec<Room>> {
  let mut stmt =
    db(conn.prepare("SELECT room_id, capacity FROM rooms ORDER BY room_id"))?;
  let rows = db(
    stmt
      .query_map([], |row| {
        Ok(Room {
          room_id:  row.get(0)?,
          capacity: row.get(1)?,
        })
      })
      .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>()),
  )?;
  Ok(rows)
}

fn get_offering_q(
  conn: &Connection,
  id_str: &str,
) -> Result<Option<ClassOffering>> {
  db(offering_row(conn, id_str))?
    .map(|raw| materialize(conn, raw))
    .transpose()
}

fn list_offerings_q(
  conn: &Connection,
  query: &OfferingQuery,
) -> Result<Vec<ClassOffering>> {
  let mut conds: Vec<&'static str> = vec![];
  if query.status.is_some() {
    conds.push("status = ?1");
  }
  if query.tutor_id.is_some() {
    conds.push("tutor_id = ?2");
  }
  if query.subject.is_some() {
    conds.push("LOWER(subject) = LOWER(?3)");
  }

  let where_clause = if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  };

  let sql = format!(
    "SELECT offering_id, tutor_id, subject, delivery_mode, slot_start,
            slot_end, meeting_link, room_id, status, rejection_reason,
            created_at
     FROM offerings {where_clause} ORDER BY created_at, offering_id"
  );

  let mut stmt = db(conn.prepare(&sql))?;
  let raws = db(
    stmt
      .query_map(
        params![
          query.status.map(encode_status),
          query.tutor_id.as_deref(),
          query.subject.as_deref(),
        ],
        |row| {
          Ok(RawOffering {
            offering_id:      row.get(0)?,
            tutor_id:         row.get(1)?,
            subject:          row.get(2)?,
            delivery_mode:    row.get(3)?,
            slot_start:       row.get(4)?,
            slot_end:         row.get(5)?,
            meeting_link:     row.get(6)?,
            room_id:          row.get(7)?,
            status:           row.get(8)?,
            rejection_reason: row.get(9)?,
            created_at:       row.get(10)?,
          })
        },
      )
      .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>()),
  )?;

  raws
    .into_iter()
    .map(|raw| materialize(conn, raw))
    .collect()
}

fn coverage_q(conn: &Connection) -> Result<BTreeMap<String, u64>> {
  let mut stmt = db(
    conn.prepare("SELECT subject, COUNT(*) FROM offerings GROUP BY subject"),
  )?;
  let rows = db(
    stmt
      .query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
      })
      .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>()),
  )?;
  Ok(rows.into_iter().map(|(s, n)| (s, n as u64)).collect())
}

fn bookings_q(conn: &Connection, room_id: &str) -> Result<Vec<RoomBooking>> {
  if db(room_row(conn, room_id))?.is_none() {
    return Err(Error::RoomNotFound(room_id.to_owned()));
  }
  // The empty exclusion id matches no booking.
  db(booking_rows(conn, room_id, ""))?
    .into_iter()
    .map(RawBooking::into_booking)
    .collect()
}

fn evaluation_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEvaluation> {
  Ok(RawEvaluation {
    evaluation_id: row.get(0)?,
    offering_id:   row.get(1)?,
    tutor_id:      row.get(2)?,
    student_id:    row.get(3)?,
    content:       row.get(4)?,
    recorded_at:   row.get(5)?,
  })
}

fn evaluations_q(
  conn: &Connection,
  id_str: &str,
  offering_id: Uuid,
) -> Result<Vec<Evaluation>> {
  if db(offering_row(conn, id_str))?.is_none() {
    return Err(Error::OfferingNotFound(offering_id));
  }
  let mut stmt = db(conn.prepare(
    "SELECT evaluation_id, offering_id, tutor_id, student_id, content,
            recorded_at
     FROM evaluations WHERE offering_id = ?1
     ORDER BY recorded_at, evaluation_id",
  ))?;
  let raws = db(
    stmt
      .query_map(params![id_str], evaluation_from_row)
      .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>()),
  )?;
  raws.into_iter().map(RawEvaluation::into_evaluation).collect()
}

fn all_evaluations_q(conn: &Connection) -> Result<Vec<Evaluation>> {
  let mut stmt = db(conn.prepare(
    "SELECT evaluation_id, offering_id, tutor_id, student_id, content,
            recorded_at
     FROM evaluations ORDER BY recorded_at, evaluation_id",
  ))?;
  let raws = db(
    stmt
      .query_map([], evaluation_from_row)
      .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>()),
  )?;
  raws.into_iter().map(RawEvaluation::into_evaluation).collect()
}

// ─── OfferingStore impl ──────────────────────────────────────────────────────

impl OfferingStore for SqliteStore {
  // ── Room catalog ──────────────────────────────────────────────────────────

  async fn add_room(&self, room_id: String, capacity: u32) -> Result<Room> {
    let room = Room::new(room_id, capacity)?;
    self
      .conn
      .call(move |conn| Ok(add_room_tx(conn, room)))
      .await
      .map_err(Error::storage)?
  }

  async fn set_capacity(&self, room_id: String, capacity: u32) -> Result<Room> {
    validate_capacity(capacity)?;
    self
      .conn
      .call(move |conn| Ok(set_capacity_tx(conn, room_id, capacity)))
      .await
      .map_err(Error::storage)?
  }

  async fn get_room(&self, room_id: String) -> Result<Option<Room>> {
    self
      .conn
      .call(move |conn| Ok(db(room_row(conn, &room_id))))
      .await
      .map_err(Error::storage)?
  }

  async fn list_rooms(&self) -> Result<Vec<Room>> {
    self
      .conn
      .call(|conn| Ok(list_rooms_q(conn)))
      .await
      .map_err(Error::storage)?
  }

  // ── Offering registry ─────────────────────────────────────────────────────

  async fn create_offering(&self, input: NewOffering) -> Result<ClassOffering> {
    input.validate()?;

    let offering = ClassOffering {
      offering_id:       Uuid::new_v4(),
      tutor_id:          input.tutor_id,
      subject:           input.subject,
      delivery_mode:     input.delivery_mode,
      timeslot:          input.timeslot,
      meeting_link:      input.meeting_link,
      room_id:           None,
      status:            OfferingStatus::Pending,
      rejection_reason:  None,
      enrolled_students: Vec::new(),
      progress_notes:    Vec::new(),
      created_at:        now_micros(),
    };

    let row = (
      encode_uuid(offering.offering_id),
      offering.tutor_id.clone(),
      offering.subject.clone(),
      encode_mode(offering.delivery_mode),
      encode_dt(offering.timeslot.start),
      encode_dt(offering.timeslot.end),
      offering.meeting_link.clone(),
      encode_dt(offering.created_at),
    );

    self
      .conn
      .call(move |conn| {
        Ok(db(conn.execute(
          "INSERT INTO offerings
             (offering_id, tutor_id, subject, delivery_mode, slot_start,
              slot_end, meeting_link, status, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'pending', ?8)",
          params![row.0, row.1, row.2, row.3, row.4, row.5, row.6, row.7],
        )))
      })
      .await
      .map_err(Error::storage)??;

    Ok(offering)
  }

  async fn get_offering(
    &self,
    offering_id: Uuid,
  ) -> Result<Option<ClassOffering>> {
    let id_str = encode_uuid(offering_id);
    self
      .conn
      .call(move |conn| Ok(get_offering_q(conn, &id_str)))
      .await
      .map_err(Error::storage)?
  }

  async fn list_offerings(
    &self,
    query: &OfferingQuery,
  ) -> Result<Vec<ClassOffering>> {
    let query = query.clone();
    self
      .conn
      .call(move |conn| Ok(list_offerings_q(conn, &query)))
      .await
      .map_err(Error::storage)?
  }

  async fn subject_coverage(&self) -> Result<BTreeMap<String, u64>> {
    self
      .conn
      .call(|conn| Ok(coverage_q(conn)))
      .await
      .map_err(Error::storage)?
  }

  // ── Approval ──────────────────────────────────────────────────────────────

  async fn approve(
    &self,
    offering_id: Uuid,
    room_id: Option<String>,
  ) -> Result<ClassOffering> {
    self
      .conn
      .call(move |conn| Ok(approve_tx(conn, offering_id, room_id)))
      .await
      .map_err(Error::storage)?
  }

  async fn reject(
    &self,
    offering_id: Uuid,
    reason: String,
  ) -> Result<ClassOffering> {
    if reason.trim().is_empty() {
      return Err(Error::Validation("rejection reason must not be empty".into()));
    }
    self
      .conn
      .call(move |conn| Ok(reject_tx(conn, offering_id, reason)))
      .await
      .map_err(Error::storage)?
  }

  async fn list_bookings(&self, room_id: String) -> Result<Vec<RoomBooking>> {
    self
      .conn
      .call(move |conn| Ok(bookings_q(conn, &room_id)))
      .await
      .map_err(Error::storage)?
  }

  // ── Enrollment ────────────────────────────────────────────────────────────

  async fn join(
    &self,
    offering_id: Uuid,
    student_id: String,
  ) -> Result<ClassOffering> {
    self
      .conn
      .call(move |conn| Ok(join_tx(conn, offering_id, student_id)))
      .await
      .map_err(Error::storage)?
  }

  async fn leave(
    &self,
    offering_id: Uuid,
    student_id: String,
  ) -> Result<ClassOffering> {
    self
      .conn
      .call(move |conn| Ok(leave_tx(conn, offering_id, student_id)))
      .await
      .map_err(Error::storage)?
  }

  // ── Annotation log ────────────────────────────────────────────────────────

  async fn add_progress_note(
    &self,
    offering_id: Uuid,
    tutor_id: String,
    content: String,
  ) -> Result<ProgressNote> {
    if content.trim().is_empty() {
      return Err(Error::Validation("note content must not be empty".into()));
    }
    self
      .conn
      .call(move |conn| Ok(note_tx(conn, offering_id, tutor_id, content)))
      .await
      .map_err(Error::storage)?
  }

  async fn add_evaluation(
    &self,
    offering_id: Uuid,
    student_id: String,
    content: String,
  ) -> Result<Evaluation> {
    if content.trim().is_empty() {
      return Err(Error::Validation(
        "evaluation content must not be empty".into(),
      ));
    }
    self
      .conn
      .call(move |conn| Ok(evaluation_tx(conn, offering_id, student_id, content)))
      .await
      .map_err(Error::storage)?
  }

  async fn list_evaluations(&self, offering_id: Uuid) -> Result<Vec<Evaluation>> {
    let id_str = encode_uuid(offering_id);
    self
      .conn
      .call(move |conn| Ok(evaluations_q(conn, &id_str, offering_id)))
      .await
      .map_err(Error::storage)?
  }

  async fn list_all_evaluations(&self) -> Result<Vec<Evaluation>> {
    self
      .conn
      .call(|conn| Ok(all_evaluations_q(conn)))
      .await
      .map_err(Error::storage)?
  }
}
