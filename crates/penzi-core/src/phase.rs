//! Registration phase, inferred from which records exist.
//!
//! No session or state column is stored. A caller's position in the
//! onboarding sequence is derived on every request from the presence of their
//! [`User`], [`ProfileDetails`] and [`SelfDescription`] records.

use serde::{Deserialize, Serialize};

use crate::user::{ProfileDetails, SelfDescription, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  Unregistered,
  AwaitingDetails,
  AwaitingDescription,
  Ready,
}

impl Phase {
  pub fn infer(
    user: Option<&User>,
    details: Option<&ProfileDetails>,
    description: Option<&SelfDescription>,
  ) -> Self {
    match (user, details, description) {
      (None, _, _) => Self::Unregistered,
      (Some(_), None, _) => Self::AwaitingDetails,
      (Some(_), Some(_), None) => Self::AwaitingDescription,
      (Some(_), Some(_), Some(_)) => Self::Ready,
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::user::Gender;

  fn user() -> User {
    User {
      user_id:    Uuid::new_v4(),
      name:       "Alice".into(),
      age:        28,
      gender:     Gender::Female,
      county:     "Nairobi".into(),
      town:       "Nairobi".into(),
      created_at: Utc::now(),
    }
  }

  fn details() -> ProfileDetails {
    ProfileDetails {
      education:      "graduate".into(),
      profession:     "nurse".into(),
      marital_status: "single".into(),
      religion:       "christian".into(),
      ethnicity:      "luhya".into(),
    }
  }

  #[test]
  fn each_record_advances_the_phase() {
    let u = user();
    let d = details();
    let s = SelfDescription {
      user_id:    u.user_id,
      text:       "kind".into(),
      updated_at: Utc::now(),
    };

    assert_eq!(Phase::infer(None, None, None), Phase::Unregistered);
    assert_eq!(Phase::infer(Some(&u), None, None), Phase::AwaitingDetails);
    assert_eq!(Phase::infer(Some(&u), Some(&d), None), Phase::AwaitingDescription);
    assert_eq!(Phase::infer(Some(&u), Some(&d), Some(&s)), Phase::Ready);
  }

  #[test]
  fn description_without_details_still_awaits_details() {
    let u = user();
    let s = SelfDescription {
      user_id:    u.user_id,
      text:       "kind".into(),
      updated_at: Utc::now(),
    };
    assert_eq!(Phase::infer(Some(&u), None, Some(&s)), Phase::AwaitingDetails);
  }
}
