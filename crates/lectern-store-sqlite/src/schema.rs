//! SQL schema for the Lectern SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS rooms (
    room_id   TEXT PRIMARY KEY,
    capacity  INTEGER NOT NULL CHECK (capacity > 0)
);

-- Offerings are never deleted; rejected rows remain as the audit record.
CREATE TABLE IF NOT EXISTS offerings (
    offering_id      TEXT PRIMARY KEY,
    tutor_id         TEXT NOT NULL,
    subject          TEXT NOT NULL,
    delivery_mode    TEXT NOT NULL,   -- 'online' | 'offline'
    slot_start       TEXT NOT NULL,   -- ISO 8601 UTC
    slot_end         TEXT NOT NULL,
    meeting_link     TEXT,            -- online offerings only
    room_id          TEXT REFERENCES rooms(room_id),  -- approved offline only
    status           TEXT NOT NULL DEFAULT 'pending', -- 'pending' | 'approved' | 'rejected'
    rejection_reason TEXT,
    created_at       TEXT NOT NULL
);

-- The timeslot index: one row per approved offline offering.
-- Rows are written only inside the approval transaction.
CREATE TABLE IF NOT EXISTS room_bookings (
    offering_id TEXT PRIMARY KEY REFERENCES offerings(offering_id),
    room_id     TEXT NOT NULL REFERENCES rooms(room_id),
    slot_start  TEXT NOT NULL,
    slot_end    TEXT NOT NULL
);

-- Enrollment history. A student is currently enrolled iff they have a row
-- with left_at IS NULL; past rows answer 'was ever enrolled'.
CREATE TABLE IF NOT EXISTS enrollments (
    enrollment_id TEXT PRIMARY KEY,
    offering_id   TEXT NOT NULL REFERENCES offerings(offering_id),
    student_id    TEXT NOT NULL,
    joined_at     TEXT NOT NULL,
    left_at       TEXT
);

CREATE TABLE IF NOT EXISTS progress_notes (
    offering_id TEXT NOT NULL REFERENCES offerings(offering_id),
    recorded_at TEXT NOT NULL,
    seq         INTEGER NOT NULL DEFAULT 0,
    content     TEXT NOT NULL,
    PRIMARY KEY (offering_id, recorded_at, seq)
);

-- Evaluations are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS evaluations (
    evaluation_id TEXT PRIMARY KEY,
    offering_id   TEXT NOT NULL REFERENCES offerings(offering_id),
    tutor_id      TEXT NOT NULL,
    student_id    TEXT NOT NULL,
    content       TEXT NOT NULL,
    recorded_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS bookings_room_idx        ON room_bookings(room_id);
CREATE INDEX IF NOT EXISTS enrollments_offering_idx ON enrollments(offering_id);
CREATE INDEX IF NOT EXISTS offerings_status_idx     ON offerings(status);
CREATE INDEX IF NOT EXISTS offerings_tutor_idx      ON offerings(tutor_id);
CREATE INDEX IF NOT EXISTS evaluations_offering_idx ON evaluations(offering_id);

PRAGMA user_version = 1;
";
