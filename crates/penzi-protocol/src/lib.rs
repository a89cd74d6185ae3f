//! The Penzi conversational protocol.
//!
//! [`Engine`] turns one inbound message into replies by dispatching the parsed
//! [`penzi_command::Command`] against a [`penzi_core::store::Repository`].
//! [`MessageService`] wraps each call in a single store transaction.
//!
//! No session state is kept anywhere: every call re-derives the caller's
//! position from stored records.

mod consent;
mod engine;
mod matching;
mod pagination;
mod registration;
pub mod resolver;
mod service;

pub use engine::{DEFAULT_PAGE_SIZE, Engine};
pub use matching::select_candidates;
pub use service::MessageService;

use penzi_command::Rejection;
use serde::Serialize;

// ─── Public types ────────────────────────────────────────────────────────────

/// One text addressed to a contact identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
  pub to:   String,
  pub text: String,
}

/// How a message was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
  Ok,
  /// Turned away with a user-facing reply; its log entries still commit.
  Rejected(Rejection),
  /// The store failed; nothing was committed.
  InternalFailure,
}

impl Status {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Ok => "ok",
      Self::Rejected(_) => "rejected",
      Self::InternalFailure => "internal_failure",
    }
  }
}

/// The result of one inbound message: a status and every reply it produced.
///
/// The first reply always goes back to the sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
  pub status:  Status,
  pub replies: Vec<OutboundMessage>,
}

impl Exchange {
  pub fn rejection(&self) -> Option<&Rejection> {
    match &self.status {
      Status::Rejected(rejection) => Some(rejection),
      _ => None,
    }
  }
}
