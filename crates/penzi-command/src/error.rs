//! The rejection taxonomy: every way a well-formed request can be turned
//! away with a user-facing reply.
//!
//! Storage failures are not rejections; they never reach this type.

use penzi_core::phase::Phase;
use thiserror::Error;

use crate::CommandKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
  /// Wrong number of `#` fields, an empty field, or a missing argument.
  #[error("bad format for {0:?}")]
  BadFormat(CommandKind),

  #[error("invalid age: {0:?}")]
  InvalidAge(String),

  #[error("invalid gender: {0:?}")]
  InvalidGender(String),

  #[error("malformed age range: {0:?}")]
  BadAgeRangeFormat(String),

  #[error("invalid age range {min}-{max}")]
  InvalidAgeRange { min: u16, max: u16 },

  #[error("caller is not registered")]
  NotRegistered,

  /// The caller skipped a registration step; carries the phase they are in.
  #[error("registration incomplete ({0:?})")]
  RegistrationIncomplete(Phase),

  #[error("self description is empty")]
  EmptyDescription,

  #[error("no pending matches")]
  NoPendingMatches,

  #[error("no user found for {0:?}")]
  TargetNotFound(String),

  #[error("target has the caller's gender")]
  SameGender,

  #[error("no pending request")]
  NoPendingRequest,

  #[error("could not extract requester from notification")]
  RequesterParsingFailed,

  #[error("{0} has no self description")]
  NoDescription(String),

  #[error("unrecognised command")]
  Unknown,
}

impl Rejection {
  /// Stable snake_case code reported to the transport layer.
  pub fn code(&self) -> &'static str {
    match self {
      Self::BadFormat(_) => "bad_format",
      Self::InvalidAge(_) => "invalid_age",
      Self::InvalidGender(_) => "invalid_gender",
      Self::BadAgeRangeFormat(_) => "bad_age_range_format",
      Self::InvalidAgeRange { .. } => "invalid_age_range",
      Self::NotRegistered => "not_registered",
      Self::RegistrationIncomplete(_) => "registration_incomplete",
      Self::EmptyDescription => "empty_description",
      Self::NoPendingMatches => "no_pending_matches",
      Self::TargetNotFound(_) => "target_not_found",
      Self::SameGender => "same_gender",
      Self::NoPendingRequest => "no_pending_request",
      Self::RequesterParsingFailed => "requester_parsing_failed",
      Self::NoDescription(_) => "no_description",
      Self::Unknown => "unknown",
    }
  }
}

pub type Result<T, E = Rejection> = std::result::Result<T, E>;
