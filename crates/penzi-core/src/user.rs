//! Users and the records hanging off them.
//!
//! A [`User`] is created once by the `START` command and never updated. The
//! optional [`ProfileDetails`] and [`SelfDescription`] records are attached
//! 1:1 by the later registration steps and may be overwritten by repeating
//! those steps. A [`ContactBinding`] ties an external phone number to a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Gender ──────────────────────────────────────────────────────────────────

/// The two genders the matching service pairs against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
  Male,
  Female,
}

impl Gender {
  /// Parse a gender token case-insensitively (`"male"`, `"FEMALE"`, ...).
  pub fn parse(token: &str) -> Option<Self> {
    let token = token.trim();
    if token.eq_ignore_ascii_case("male") {
      Some(Self::Male)
    } else if token.eq_ignore_ascii_case("female") {
      Some(Self::Female)
    } else {
      None
    }
  }

  /// The title-cased form stored in the database and shown to users.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Male => "Male",
      Self::Female => "Female",
    }
  }

  pub fn opposite(self) -> Self {
    match self {
      Self::Male => Self::Female,
      Self::Female => Self::Male,
    }
  }

  /// Strict decode of the stored column value.
  pub fn decode(s: &str) -> Result<Self> {
    match s {
      "Male" => Ok(Self::Male),
      "Female" => Ok(Self::Female),
      other => Err(Error::UnknownGender(other.to_string())),
    }
  }
}

impl std::fmt::Display for Gender {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── User ────────────────────────────────────────────────────────────────────

/// A registered participant. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  pub name:       String,
  pub age:        u8,
  pub gender:     Gender,
  pub county:     String,
  pub town:       String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::Repository::create_user`]. `user_id` and
/// `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
  pub name:   String,
  pub age:    u8,
  pub gender: Gender,
  pub county: String,
  pub town:   String,
}

// ─── Contact binding ─────────────────────────────────────────────────────────

/// Associates an opaque external identifier (a phone number) with a user.
/// The most recent binding for an identifier is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactBinding {
  pub binding_id: Uuid,
  pub contact:    String,
  pub user_id:    Uuid,
  pub created_at: DateTime<Utc>,
}

// ─── Optional profile records ────────────────────────────────────────────────

/// The attributes supplied by the `DETAILS` step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDetails {
  pub education:      String,
  pub profession:     String,
  pub marital_status: String,
  pub religion:       String,
  pub ethnicity:      String,
}

/// The free text supplied by the `MYSELF` step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfDescription {
  pub user_id:    Uuid,
  pub text:       String,
  pub updated_at: DateTime<Utc>,
}

/// A user together with the contact they can be reached on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
  pub user:    User,
  pub contact: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn gender_parse_is_case_insensitive() {
    assert_eq!(Gender::parse("male"), Some(Gender::Male));
    assert_eq!(Gender::parse(" FEMALE "), Some(Gender::Female));
    assert_eq!(Gender::parse("other"), None);
  }

  #[test]
  fn gender_decode_rejects_lowercase() {
    assert_eq!(Gender::decode("Female").unwrap(), Gender::Female);
    assert!(Gender::decode("female").is_err());
  }

  #[test]
  fn opposite_flips() {
    assert_eq!(Gender::Male.opposite(), Gender::Female);
    assert_eq!(Gender::Female.opposite(), Gender::Male);
  }
}
