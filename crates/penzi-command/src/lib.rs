//! Command grammar and reply templates for Penzi.
//!
//! Converts inbound message text into a closed [`Command`] type and renders
//! outbound replies. Pure synchronous; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use penzi_command::{Command, Formatter, parse};
//!
//! let command = parse("MATCH#23-25#Kisumu");
//! assert!(matches!(command, Command::MatchQuery(Ok(_))));
//! println!("{}", Formatter::default().welcome());
//! ```

pub mod error;
mod parse;
mod render;

pub use error::Rejection;
pub use render::{Formatter, noun, notification_greeting, requester_name};

use penzi_core::{
  matching::AgeRange,
  user::{NewUser, ProfileDetails},
};

// ─── Public types
// ─────────────────────────────────────────────────────────────

/// Arguments of a `MATCH#min-max#town` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCriteria {
  pub age_range: AgeRange,
  /// Compared against candidates' county.
  pub town:      String,
}

/// A decoded inbound message.
///
/// Variants whose keyword was recognised but whose arguments were not valid
/// carry the [`Rejection`] inline, so the caller can still gate on
/// registration before reporting the field problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// `PENZI`
  Activate,
  /// `START#name#age#gender#county#town`
  Register(Result<NewUser, Rejection>),
  /// `DETAILS#education#profession#maritalStatus#religion#ethnicity`
  SubmitDetails(Result<ProfileDetails, Rejection>),
  /// `MYSELF <text>`; the text may be empty.
  SubmitDescription(String),
  /// `MATCH#min-max#town`
  MatchQuery(Result<MatchCriteria, Rejection>),
  /// `NEXT`
  NextPage,
  /// A bare phone number.
  ProfileLookup(String),
  /// `DESCRIBE <phone>`
  Describe(Result<String, Rejection>),
  /// `YES`
  Consent,
  Unknown,
}

/// The tag of a [`Command`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
  Activate,
  Register,
  Details,
  Description,
  Match,
  Next,
  Lookup,
  Describe,
  Consent,
  Unknown,
}

impl CommandKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Activate => "activate",
      Self::Register => "register",
      Self::Details => "details",
      Self::Description => "description",
      Self::Match => "match",
      Self::Next => "next",
      Self::Lookup => "lookup",
      Self::Describe => "describe",
      Self::Consent => "consent",
      Self::Unknown => "unknown",
    }
  }
}

impl Command {
  pub fn kind(&self) -> CommandKind {
    match self {
      Self::Activate => CommandKind::Activate,
      Self::Register(_) => CommandKind::Register,
      Self::SubmitDetails(_) => CommandKind::Details,
      Self::SubmitDescription(_) => CommandKind::Description,
      Self::MatchQuery(_) => CommandKind::Match,
      Self::NextPage => CommandKind::Next,
      Self::ProfileLookup(_) => CommandKind::Lookup,
      Self::Describe(_) => CommandKind::Describe,
      Self::Consent => CommandKind::Consent,
      Self::Unknown => CommandKind::Unknown,
    }
  }
}

// ─── Public API
// ───────────────────────────────────────────────────────────────

/// Decode one inbound message. Never fails: unrecognised text is
/// [`Command::Unknown`].
pub fn parse(input: &str) -> Command { parse::parse(input) }

/// Reduce a phone token to the digit suffix used for lookups: the last nine
/// digits, or all of them when there are fewer.
pub fn phone_suffix(token: &str) -> String {
  const SUFFIX_LEN: usize = 9;
  let digits: Vec<char> = token.chars().filter(char::is_ascii_digit).collect();
  let start = digits.len().saturating_sub(SUFFIX_LEN);
  digits[start..].iter().collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn suffix_ignores_country_code() {
    assert_eq!(phone_suffix("+254722010203"), "722010203");
    assert_eq!(phone_suffix("0722010203"), "722010203");
    assert_eq!(phone_suffix("12345"), "12345");
  }

  #[test]
  fn kind_matches_variant() {
    assert_eq!(parse("PENZI").kind(), CommandKind::Activate);
    assert_eq!(parse("0722010203").kind(), CommandKind::Lookup);
    assert_eq!(parse("gibberish").kind(), CommandKind::Unknown);
  }
}
