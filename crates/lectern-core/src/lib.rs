//! Core types and trait definitions for the Lectern offering registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod offering;
pub mod report;
pub mod role;
pub mod room;
pub mod store;
pub mod timeslot;

pub use error::{Error, Result};
