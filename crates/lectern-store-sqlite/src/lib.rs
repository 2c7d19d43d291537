//! SQLite backend for the Lectern offering registry.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! worker thread without blocking the async runtime. That single thread also
//! provides the write-serialization contract of the store trait: each call's
//! closure runs to completion before the next, and multi-statement
//! operations commit inside an explicit transaction.

mod encode;
mod schema;
mod store;

pub use store::SqliteStore;

#[cfg(test)]
mod tests;
