//! Match queries and the persisted, paginated batches they produce.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Age range ───────────────────────────────────────────────────────────────

/// An inclusive age range, rendered as `min-max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
  pub min: u8,
  pub max: u8,
}

impl AgeRange {
  /// Recorded against the placeholder query created at registration.
  pub const WIDE: Self = Self { min: 18, max: 100 };

  pub fn contains(&self, age: u8) -> bool { (self.min..=self.max).contains(&age) }

  pub fn encode(&self) -> String { format!("{}-{}", self.min, self.max) }

  pub fn decode(s: &str) -> Result<Self> {
    let malformed = || Error::MalformedAgeRange(s.to_string());
    let (min, max) = s.split_once('-').ok_or_else(malformed)?;
    Ok(Self {
      min: min.trim().parse().map_err(|_| malformed())?,
      max: max.trim().parse().map_err(|_| malformed())?,
    })
  }
}

// ─── Match query ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
  /// The placeholder written when a user registers.
  Initial,
  /// A `MATCH` that found at least one candidate.
  Matched,
  /// A `MATCH` that found nobody.
  Empty,
}

impl QueryStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Initial => "initial",
      Self::Matched => "matched",
      Self::Empty => "empty",
    }
  }

  pub fn decode(s: &str) -> Result<Self> {
    match s {
      "initial" => Ok(Self::Initial),
      "matched" => Ok(Self::Matched),
      "empty" => Ok(Self::Empty),
      other => Err(Error::UnknownQueryStatus(other.to_string())),
    }
  }
}

/// The parameters of one `MATCH` invocation. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchQuery {
  pub query_id:   Uuid,
  pub user_id:    Uuid,
  pub age_range:  AgeRange,
  pub location:   String,
  pub status:     QueryStatus,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::Repository::record_match_query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatchQuery {
  pub user_id:   Uuid,
  pub age_range: AgeRange,
  pub location:  String,
  pub status:    QueryStatus,
}

// ─── Match batch ─────────────────────────────────────────────────────────────

/// One candidate as served to the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntry {
  pub name:    String,
  pub age:     u8,
  pub contact: String,
}

/// The materialised result set of one [`MatchQuery`].
///
/// Only `shown` ever changes, and it only grows, never past `total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchBatch {
  pub batch_id:   Uuid,
  pub query_id:   Uuid,
  pub user_id:    Uuid,
  pub total:      usize,
  pub shown:      usize,
  pub entries:    Vec<MatchEntry>,
  pub created_at: DateTime<Utc>,
}

impl MatchBatch {
  pub fn remaining(&self) -> usize { self.total.saturating_sub(self.shown) }

  pub fn is_exhausted(&self) -> bool { self.shown >= self.total }

  /// The next slice of at most `page_size` entries starting at `shown`.
  pub fn next_page(&self, page_size: usize) -> &[MatchEntry] {
    let start = self.shown.min(self.entries.len());
    let end = start
      .saturating_add(page_size)
      .min(self.total)
      .min(self.entries.len());
    &self.entries[start..end]
  }
}
