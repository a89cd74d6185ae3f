//! Inbound message grammar.
//!
//! Three shapes are recognised:
//!   `KEYWORD#field#field…`  → START, DETAILS, MATCH
//!   `KEYWORD [argument]`    → PENZI, YES, NEXT, MYSELF, DESCRIBE
//!   `+2547…` / `07…`        → bare phone number (profile lookup)
//!
//! Keywords are case-insensitive. A recognised keyword always yields its own
//! [`Command`] variant; field problems travel inside it as a [`Rejection`].

use penzi_core::{
  matching::AgeRange,
  user::{Gender, NewUser, ProfileDetails},
};

use crate::{Command, CommandKind, MatchCriteria, error::Rejection};

const REGISTER_FIELDS: usize = 5;
const DETAILS_FIELDS: usize = 5;
const MATCH_FIELDS: usize = 2;
const MIN_AGE: u16 = 18;

pub(crate) fn parse(input: &str) -> Command {
  let text = input.trim();
  if text.is_empty() {
    return Command::Unknown;
  }

  let (keyword, fields) = match text.split_once('#') {
    Some((keyword, rest)) => (keyword.trim(), Some(rest)),
    None => (first_word(text).0, None),
  };

  match keyword.to_ascii_uppercase().as_str() {
    "START" => return Command::Register(parse_registration(fields)),
    "DETAILS" => return Command::SubmitDetails(parse_details(fields)),
    "MATCH" => return Command::MatchQuery(parse_match(fields)),
    _ => {}
  }

  let (head, tail) = first_word(text);
  match head.to_ascii_uppercase().as_str() {
    "PENZI" if tail.is_empty() => Command::Activate,
    "YES" if tail.is_empty() => Command::Consent,
    "NEXT" if tail.is_empty() => Command::NextPage,
    "MYSELF" => Command::SubmitDescription(tail.to_string()),
    "DESCRIBE" => Command::Describe(parse_describe(tail)),
    _ if is_phone_token(text) => Command::ProfileLookup(text.to_string()),
    _ => Command::Unknown,
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Split off the first whitespace-delimited word; the remainder is trimmed.
fn first_word(s: &str) -> (&str, &str) {
  match s.split_once(char::is_whitespace) {
    Some((head, tail)) => (head, tail.trim()),
    None => (s, ""),
  }
}

/// A phone token is digits, optionally preceded by a single `+`.
pub(crate) fn is_phone_token(s: &str) -> bool {
  let digits = s.strip_prefix('+').unwrap_or(s);
  !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Split `#` fields, demanding exactly `count` non-empty values.
fn exact_fields(
  fields: Option<&str>,
  count: usize,
  kind: CommandKind,
) -> Result<Vec<&str>, Rejection> {
  let fields: Vec<&str> = match fields {
    Some(rest) => rest.split('#').map(str::trim).collect(),
    None => Vec::new(),
  };
  if fields.len() != count || fields.iter().any(|f| f.is_empty()) {
    return Err(Rejection::BadFormat(kind));
  }
  Ok(fields)
}

// ─── Per-command field parsers ───────────────────────────────────────────────

fn parse_registration(fields: Option<&str>) -> Result<NewUser, Rejection> {
  let f = exact_fields(fields, REGISTER_FIELDS, CommandKind::Register)?;

  let age = f[1]
    .parse::<u32>()
    .ok()
    .filter(|age| *age >= u32::from(MIN_AGE))
    .map(|age| u8::try_from(age).unwrap_or(u8::MAX))
    .ok_or_else(|| Rejection::InvalidAge(f[1].to_string()))?;
  let gender =
    Gender::parse(f[2]).ok_or_else(|| Rejection::InvalidGender(f[2].to_string()))?;

  Ok(NewUser {
    name: f[0].to_string(),
    age,
    gender,
    county: f[3].to_string(),
    town: f[4].to_string(),
  })
}

fn parse_details(fields: Option<&str>) -> Result<ProfileDetails, Rejection> {
  let f = exact_fields(fields, DETAILS_FIELDS, CommandKind::Details)?;
  Ok(ProfileDetails {
    education:      f[0].to_string(),
    profession:     f[1].to_string(),
    marital_status: f[2].to_string(),
    religion:       f[3].to_string(),
    ethnicity:      f[4].to_string(),
  })
}

fn parse_match(fields: Option<&str>) -> Result<MatchCriteria, Rejection> {
  let f = exact_fields(fields, MATCH_FIELDS, CommandKind::Match)?;
  Ok(MatchCriteria {
    age_range: parse_age_range(f[0])?,
    town:      f[1].to_string(),
  })
}

/// Parse `min-max`. Bounds above 255 are clamped once validated.
pub(crate) fn parse_age_range(raw: &str) -> Result<AgeRange, Rejection> {
  let malformed = || Rejection::BadAgeRangeFormat(raw.to_string());
  let (min, max) = raw.split_once('-').ok_or_else(malformed)?;
  let min: u16 = min.trim().parse().map_err(|_| malformed())?;
  let max: u16 = max.trim().parse().map_err(|_| malformed())?;

  if min < MIN_AGE || max < min {
    return Err(Rejection::InvalidAgeRange { min, max });
  }

  let clamp = |v: u16| u8::try_from(v).unwrap_or(u8::MAX);
  Ok(AgeRange {
    min: clamp(min),
    max: clamp(max),
  })
}

fn parse_describe(tail: &str) -> Result<String, Rejection> {
  if is_phone_token(tail) {
    Ok(tail.to_string())
  } else {
    Err(Rejection::BadFormat(CommandKind::Describe))
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
