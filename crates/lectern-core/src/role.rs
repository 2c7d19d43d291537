//! Actor roles, as resolved by the upstream identity collaborator.
//!
//! The core never authenticates anyone; it receives an opaque user id plus a
//! role claim with every call, and each operation declares the roles it
//! accepts.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Student,
  Tutor,
  Coordinator,
  DeptChair,
  Admin,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Student => "student",
      Self::Tutor => "tutor",
      Self::Coordinator => "coordinator",
      Self::DeptChair => "deptchair",
      Self::Admin => "admin",
    }
  }
}

impl FromStr for Role {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    match s {
      "student" => Ok(Self::Student),
      "tutor" => Ok(Self::Tutor),
      "coordinator" => Ok(Self::Coordinator),
      "deptchair" => Ok(Self::DeptChair),
      "admin" => Ok(Self::Admin),
      other => Err(Error::Validation(format!("unknown role: {other:?}"))),
    }
  }
}
