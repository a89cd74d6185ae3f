//! The interaction log: an append-only record of every message exchanged
//! with a user.
//!
//! Besides serving as history, the log is the only place the consent
//! handshake finds its pending state: a notification pushed to a user is an
//! outbound entry on that user's log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Inbound,
  Outbound,
}

impl Direction {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Inbound => "inbound",
      Self::Outbound => "outbound",
    }
  }

  pub fn decode(s: &str) -> Result<Self> {
    match s {
      "inbound" => Ok(Self::Inbound),
      "outbound" => Ok(Self::Outbound),
      other => Err(Error::UnknownDirection(other.to_string())),
    }
  }
}

/// One immutable log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedMessage {
  pub message_id:  Uuid,
  pub user_id:     Uuid,
  pub direction:   Direction,
  pub text:        String,
  pub recorded_at: DateTime<Utc>,
}
