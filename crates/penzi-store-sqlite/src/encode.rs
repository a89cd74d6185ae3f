//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. A batch's entries are stored as a compact
//! JSON array.

use chrono::{DateTime, Utc};
use penzi_core::{
  matching::{AgeRange, MatchBatch, MatchEntry, MatchQuery, QueryStatus},
  message::{Direction, LoggedMessage},
  user::{Candidate, ContactBinding, Gender, SelfDescription, User},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Contacts ────────────────────────────────────────────────────────────────

/// The digits of a contact identifier, used for suffix lookups.
pub fn contact_digits(contact: &str) -> String {
  contact.chars().filter(char::is_ascii_digit).collect()
}

// ─── Counters ────────────────────────────────────────────────────────────────

pub fn encode_count(column: &'static str, n: usize) -> Result<i64> {
  i64::try_from(n).map_err(|_| Error::OutOfRange {
    column,
    value: i64::MAX,
  })
}

fn decode_count(column: &'static str, value: i64) -> Result<usize> {
  usize::try_from(value).map_err(|_| Error::OutOfRange { column, value })
}

// ─── Match entries ───────────────────────────────────────────────────────────

pub fn encode_entries(entries: &[MatchEntry]) -> Result<String> {
  Ok(serde_json::to_string(entries)?)
}

pub fn decode_entries(s: &str) -> Result<Vec<MatchEntry>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawUser::from_row`] (offset 0).
pub const USER_COLUMNS: &str =
  "u.user_id, u.name, u.age, u.gender, u.county, u.town, u.created_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub name:       String,
  pub age:        u8,
  pub gender:     String,
  pub county:     String,
  pub town:       String,
  pub created_at: String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      name:       row.get(1)?,
      age:        row.get(2)?,
      gender:     row.get(3)?,
      county:     row.get(4)?,
      town:       row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      name:       self.name,
      age:        self.age,
      gender:     Gender::decode(&self.gender)?,
      county:     self.county,
      town:       self.town,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// A user row followed by a contact column.
pub struct RawCandidate {
  pub user:    RawUser,
  pub contact: String,
}

impl RawCandidate {
  pub fn into_candidate(self) -> Result<Candidate> {
    Ok(Candidate {
      user:    self.user.into_user()?,
      contact: self.contact,
    })
  }
}

/// Raw strings read directly from a `contact_bindings` row.
pub struct RawBinding {
  pub binding_id: String,
  pub contact:    String,
  pub user_id:    String,
  pub created_at: String,
}

impl RawBinding {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      binding_id: row.get(0)?,
      contact:    row.get(1)?,
      user_id:    row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_binding(self) -> Result<ContactBinding> {
    Ok(ContactBinding {
      binding_id: decode_uuid(&self.binding_id)?,
      contact:    self.contact,
      user_id:    decode_uuid(&self.user_id)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `self_descriptions` row.
pub struct RawDescription {
  pub user_id:    String,
  pub text:       String,
  pub updated_at: String,
}

impl RawDescription {
  pub fn into_description(self) -> Result<SelfDescription> {
    Ok(SelfDescription {
      user_id:    decode_uuid(&self.user_id)?,
      text:       self.text,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `messages` row.
pub struct RawMessage {
  pub message_id:  String,
  pub user_id:     String,
  pub direction:   String,
  pub text:        String,
  pub recorded_at: String,
}

impl RawMessage {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      message_id:  row.get(0)?,
      user_id:     row.get(1)?,
      direction:   row.get(2)?,
      text:        row.get(3)?,
      recorded_at: row.get(4)?,
    })
  }

  pub fn into_message(self) -> Result<LoggedMessage> {
    Ok(LoggedMessage {
      message_id:  decode_uuid(&self.message_id)?,
      user_id:     decode_uuid(&self.user_id)?,
      direction:   Direction::decode(&self.direction)?,
      text:        self.text,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw strings read directly from a `match_queries` row.
pub struct RawQuery {
  pub query_id:   String,
  pub user_id:    String,
  pub age_range:  String,
  pub location:   String,
  pub status:     String,
  pub created_at: String,
}

impl RawQuery {
  pub fn into_query(self) -> Result<MatchQuery> {
    Ok(MatchQuery {
      query_id:   decode_uuid(&self.query_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      age_range:  AgeRange::decode(&self.age_range)?,
      location:   self.location,
      status:     QueryStatus::decode(&self.status)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `match_batches` row.
pub struct RawBatch {
  pub batch_id:   String,
  pub query_id:   String,
  pub user_id:    String,
  pub total:      i64,
  pub shown:      i64,
  pub match_data: String,
  pub created_at: String,
}

impl RawBatch {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      batch_id:   row.get(0)?,
      query_id:   row.get(1)?,
      user_id:    row.get(2)?,
      total:      row.get(3)?,
      shown:      row.get(4)?,
      match_data: row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_batch(self) -> Result<MatchBatch> {
    Ok(MatchBatch {
      batch_id:   decode_uuid(&self.batch_id)?,
      query_id:   decode_uuid(&self.query_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      total:      decode_count("total", self.total)?,
      shown:      decode_count("shown", self.shown)?,
      entries:    decode_entries(&self.match_data)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
