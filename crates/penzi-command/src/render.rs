//! Outbound message templates.
//!
//! Every reply the service sends is built here. The consent handshake reads
//! interest notifications back out of the log, so [`requester_name`] only
//! accepts text shaped exactly like [`Formatter::interest_notification`].

use std::sync::LazyLock;

use penzi_core::{
  matching::MatchEntry,
  phase::Phase,
  user::{Gender, ProfileDetails, User},
};
use regex::Regex;

use crate::{CommandKind, error::Rejection};

/// Everything after the greeting of an interest notification.
static NOTIFICATION_BODY: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^a (?:man|lady) called (.+?) is interested in you and requested your details\. (?:He|She) is aged \d+ based in .+\. Do you want to know more about (?:him|her)\? Send YES to \S+$",
  )
  .expect("static regex")
});

/// How every interest notification sent to `recipient` begins.
pub fn notification_greeting(recipient: &str) -> String {
  format!("Hi {recipient}, ")
}

/// Extract the requester's name from an interest notification addressed to
/// `recipient`. Any other text, including replies that merely quote the
/// notification wording, yields `None`.
pub fn requester_name(recipient: &str, notification: &str) -> Option<String> {
  let body = notification.strip_prefix(&notification_greeting(recipient))?;
  NOTIFICATION_BODY
    .captures(body)
    .and_then(|c| c.get(1))
    .map(|m| m.as_str().trim().to_string())
    .filter(|name| !name.is_empty())
}

// ─── Grammar helpers ─────────────────────────────────────────────────────────

/// `man`/`men` or `lady`/`ladies`, depending on `count`.
pub fn noun(gender: Gender, count: usize) -> &'static str {
  match (gender, count == 1) {
    (Gender::Male, true) => "man",
    (Gender::Male, false) => "men",
    (Gender::Female, true) => "lady",
    (Gender::Female, false) => "ladies",
  }
}

fn subject_pronoun(gender: Gender) -> &'static str {
  match gender {
    Gender::Male => "He",
    Gender::Female => "She",
  }
}

fn object_pronoun(gender: Gender) -> &'static str {
  match gender {
    Gender::Male => "him",
    Gender::Female => "her",
  }
}

fn possessive(gender: Gender) -> &'static str {
  match gender {
    Gender::Male => "his",
    Gender::Female => "her",
  }
}

fn reflexive(gender: Gender) -> &'static str {
  match gender {
    Gender::Male => "himself",
    Gender::Female => "herself",
  }
}

// ─── Formatter ───────────────────────────────────────────────────────────────

/// Renders replies that mention the service's short code.
#[derive(Debug, Clone)]
pub struct Formatter {
  short_code: String,
}

impl Default for Formatter {
  fn default() -> Self { Self::new("22141") }
}

impl Formatter {
  pub fn new(short_code: impl Into<String>) -> Self {
    Self {
      short_code: short_code.into(),
    }
  }

  // ── Registration ────────────────────────────────────────────────────────

  pub fn welcome(&self) -> String {
    format!(
      "Welcome to our dating service! To register SMS \
       start#name#age#gender#county#town to {}. \
       E.g., start#John Doe#26#Male#Nakuru#Naivasha",
      self.short_code
    )
  }

  pub fn registered(&self, name: &str) -> String {
    format!(
      "Your profile has been created successfully {name}. {}",
      self.details_instructions()
    )
  }

  fn details_instructions(&self) -> String {
    format!(
      "SMS details#levelOfEducation#profession#maritalStatus#religion#ethnicity \
       to {}. E.g. details#diploma#driver#single#christian#mijikenda",
      self.short_code
    )
  }

  pub fn details_saved(&self) -> String {
    format!(
      "This is the last stage of registration. SMS a brief description of \
       yourself to {} starting with the word MYSELF. \
       E.g., MYSELF chocolate, lovely, sexy etc.",
      self.short_code
    )
  }

  pub fn description_saved(&self) -> String {
    format!(
      "You are now registered for dating. To search for a MPENZI, SMS \
       match#age#town to {} and meet the person of your dreams. \
       E.g., match#23-25#Kisumu",
      self.short_code
    )
  }

  // ── Matching ────────────────────────────────────────────────────────────

  /// The reply to a `MATCH` that found `total` candidates of `gender`.
  pub fn match_results(
    &self,
    gender: Gender,
    total: usize,
    page: &[MatchEntry],
    remaining: usize,
  ) -> String {
    let verb = if total == 1 { "matches" } else { "match" };
    let mut lines = vec![format!(
      "We have {total} {} who {verb} your choice! Here are the details of {} of them:",
      noun(gender, total),
      page.len()
    )];
    lines.extend(page.iter().map(entry_line));
    lines.push(self.lookup_hint(gender));
    if remaining > 0 {
      lines.push(self.next_hint(gender, remaining));
    }
    lines.join("\n")
  }

  pub fn no_matches(&self, gender: Gender) -> String {
    format!(
      "Sorry, no {} match your choice at the moment. Try a different age \
       range or town, e.g., match#23-35#Nairobi",
      noun(gender, 0)
    )
  }

  /// The reply to `NEXT`.
  pub fn next_page(&self, gender: Gender, page: &[MatchEntry], remaining: usize) -> String {
    let mut lines: Vec<String> = page.iter().map(entry_line).collect();
    lines.push(self.lookup_hint(gender));
    if remaining > 0 {
      lines.push(self.next_hint(gender, remaining));
    }
    lines.join("\n")
  }

  fn lookup_hint(&self, gender: Gender) -> String {
    format!(
      "To get more details about a {}, SMS {} number e.g., 0722010203 to {}",
      noun(gender, 1),
      possessive(gender),
      self.short_code
    )
  }

  fn next_hint(&self, gender: Gender, remaining: usize) -> String {
    format!(
      "Send NEXT to {} to receive details of the remaining {remaining} {}",
      self.short_code,
      noun(gender, remaining)
    )
  }

  // ── Disclosure ──────────────────────────────────────────────────────────

  /// A full profile card followed by a `DESCRIBE` hint.
  pub fn profile_card(
    &self,
    user: &User,
    details: Option<&ProfileDetails>,
    contact: &str,
  ) -> String {
    let mut parts = vec![
      format!("{} aged {}", user.name, user.age),
      format!("{} County", user.county),
      format!("{} town", user.town),
    ];
    if let Some(d) = details {
      parts.extend([
        d.education.clone(),
        d.profession.clone(),
        d.marital_status.clone(),
        d.religion.clone(),
        d.ethnicity.clone(),
      ]);
    }
    format!(
      "{}. Send DESCRIBE {contact} to get more details about {}.",
      parts.join(", "),
      user.name
    )
  }

  /// Pushed to `target` when `requester` looks them up.
  pub fn interest_notification(&self, target: &User, requester: &User) -> String {
    let g = requester.gender;
    format!(
      "{}a {} called {} is interested in you and requested your details. \
       {} is aged {} based in {}. Do you want to know more about {}? \
       Send YES to {}",
      notification_greeting(&target.name),
      noun(g, 1),
      requester.name,
      subject_pronoun(g),
      requester.age,
      requester.county,
      object_pronoun(g),
      self.short_code
    )
  }

  pub fn description(&self, user: &User, text: &str) -> String {
    format!("{} describes {} as {text}", user.name, reflexive(user.gender))
  }

  // ── Errors ──────────────────────────────────────────────────────────────

  pub fn help(&self) -> String {
    format!(
      "Invalid command. Available commands (send to {}):\n\
       1. PENZI (activate service)\n\
       2. START#name#age#gender#county#town\n\
       3. DETAILS#education#profession#status#religion#ethnicity\n\
       4. MYSELF description\n\
       5. MATCH#age-range#town\n\
       6. NEXT (for more matches)\n\
       7. Phone number (to get profile)\n\
       8. DESCRIBE phone_number\n\
       9. YES (to confirm interest)",
      self.short_code
    )
  }

  pub fn apology(&self) -> String {
    "Sorry, we could not process your request right now. Please try again later."
      .to_string()
  }

  fn usage(&self, kind: CommandKind) -> String {
    let grammar = match kind {
      CommandKind::Register => "start#name#age#gender#county#town",
      CommandKind::Details => {
        "details#levelOfEducation#profession#maritalStatus#religion#ethnicity"
      }
      CommandKind::Match => "match#age-range#town, e.g., match#23-25#Kisumu",
      CommandKind::Describe => "DESCRIBE phone_number, e.g., DESCRIBE 0722010203",
      _ => return self.help(),
    };
    format!("Invalid format. Use {grammar} and send to {}", self.short_code)
  }

  /// The reply for a rejected command.
  pub fn rejection(&self, rejection: &Rejection) -> String {
    match rejection {
      Rejection::BadFormat(kind) => self.usage(*kind),
      Rejection::InvalidAge(age) => format!(
        "Invalid age {age:?}. You must be 18 years or older to register."
      ),
      Rejection::InvalidGender(gender) => {
        format!("Invalid gender {gender:?}. Gender must be Male or Female.")
      }
      Rejection::BadAgeRangeFormat(_) => {
        "Invalid age range format. Use: min-max (e.g., 23-25)".to_string()
      }
      Rejection::InvalidAgeRange { .. } => "Invalid age range. Minimum age is 18 \
                                            and maximum age must be greater than \
                                            minimum."
        .to_string(),
      Rejection::NotRegistered => self.welcome(),
      Rejection::RegistrationIncomplete(phase) => match phase {
        Phase::AwaitingDetails => format!(
          "You have not completed your registration. {}",
          self.details_instructions()
        ),
        Phase::AwaitingDescription => self.details_saved(),
        Phase::Unregistered | Phase::Ready => self.welcome(),
      },
      Rejection::EmptyDescription => format!(
        "Please describe yourself after the word MYSELF and send to {}. \
         E.g., MYSELF chocolate, lovely, sexy etc.",
        self.short_code
      ),
      Rejection::NoPendingMatches => format!(
        "You have no pending matches. SMS match#age#town to {} to search again.",
        self.short_code
      ),
      Rejection::TargetNotFound(who) => {
        format!("Sorry, we could not find a user registered as {who}.")
      }
      Rejection::SameGender => {
        "Sorry, you can only request details of the opposite gender.".to_string()
      }
      Rejection::NoPendingRequest => {
        "You have no pending requests to respond to.".to_string()
      }
      Rejection::RequesterParsingFailed => {
        "Sorry, we could not tell who requested your details.".to_string()
      }
      Rejection::NoDescription(name) => {
        format!("{name} has not added a description yet.")
      }
      Rejection::Unknown => self.help(),
    }
  }
}

fn entry_line(entry: &MatchEntry) -> String {
  format!("{} aged {}, {}.", entry.name, entry.age, entry.contact)
}
