//! MATCH: compute the candidate set once and persist it as a batch.

use penzi_command::{Formatter, MatchCriteria, Rejection};
use penzi_core::{
  matching::{MatchEntry, NewMatchQuery, QueryStatus},
  phase::Phase,
  store::Repository,
  user::{Candidate, User},
};
use tracing::debug;

use crate::{
  engine::{Handled, Reply},
  resolver,
};

/// Check if a candidate satisfies a MATCH query.
///
/// The town token is compared against the candidate's county.
#[inline]
pub fn matches_criteria(candidate: &Candidate, criteria: &MatchCriteria) -> bool {
  if !criteria.age_range.contains(candidate.user.age) {
    return false;
  }

  candidate.user.county.trim().to_lowercase() == criteria.town.trim().to_lowercase()
}

/// Filter candidates of the opposite gender to `requester`, keeping their
/// input order.
pub fn select_candidates(
  requester: &User,
  candidates: Vec<Candidate>,
  criteria: &MatchCriteria,
) -> Vec<MatchEntry> {
  let wanted = requester.gender.opposite();
  candidates
    .into_iter()
    .filter(|c| c.user.gender == wanted && c.user.user_id != requester.user_id)
    .filter(|c| matches_criteria(c, criteria))
    .map(|c| MatchEntry {
      name:    c.user.name,
      age:     c.user.age,
      contact: c.contact,
    })
    .collect()
}

pub(crate) fn run<R>(
  repo: &mut R,
  formatter: &Formatter,
  page_size: usize,
  user: &User,
  criteria: Result<MatchCriteria, Rejection>,
) -> Handled<R::Error>
where
  R: Repository + ?Sized,
{
  let phase = resolver::phase(&*repo, user)?;
  if phase != Phase::Ready {
    return Ok(Err(Rejection::RegistrationIncomplete(phase)));
  }
  let criteria = match criteria {
    Ok(criteria) => criteria,
    Err(rejection) => return Ok(Err(rejection)),
  };

  let wanted = user.gender.opposite();
  let entries =
    select_candidates(user, repo.list_candidates(wanted)?, &criteria);
  let total = entries.len();

  let query = repo.record_match_query(NewMatchQuery {
    user_id:   user.user_id,
    age_range: criteria.age_range,
    location:  criteria.town.clone(),
    status:    if total == 0 {
      QueryStatus::Empty
    } else {
      QueryStatus::Matched
    },
  })?;
  debug!(
    user_id = %user.user_id,
    query_id = %query.query_id,
    total,
    "match query evaluated"
  );

  if total == 0 {
    return Ok(Ok(Reply::text(formatter.no_matches(wanted))));
  }

  let batch = repo.create_batch(query.query_id, user.user_id, entries)?;
  let page = batch.next_page(page_size);
  let shown = page.len();
  repo.advance_batch(batch.batch_id, 0, shown)?;

  Ok(Ok(Reply::text(formatter.match_results(
    wanted,
    total,
    page,
    total - shown,
  ))))
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use penzi_core::{matching::AgeRange, user::Gender};
  use uuid::Uuid;

  use super::*;

  fn user(name: &str, age: u8, gender: Gender, county: &str) -> User {
    User {
      user_id: Uuid::new_v4(),
      name: name.into(),
      age,
      gender,
      county: county.into(),
      town: "Town".into(),
      created_at: Utc::now(),
    }
  }

  fn candidate(name: &str, age: u8, gender: Gender, county: &str) -> Candidate {
    Candidate {
      user:    user(name, age, gender, county),
      contact: format!("07{age:08}"),
    }
  }

  fn criteria(min: u8, max: u8, town: &str) -> MatchCriteria {
    MatchCriteria {
      age_range: AgeRange { min, max },
      town:      town.into(),
    }
  }

  #[test]
  fn age_bounds_are_inclusive() {
    let c = criteria(25, 30, "Nairobi");
    assert!(matches_criteria(&candidate("A", 25, Gender::Male, "Nairobi"), &c));
    assert!(matches_criteria(&candidate("B", 30, Gender::Male, "Nairobi"), &c));
    assert!(!matches_criteria(&candidate("C", 31, Gender::Male, "Nairobi"), &c));
    assert!(!matches_criteria(&candidate("D", 24, Gender::Male, "Nairobi"), &c));
  }

  #[test]
  fn county_compared_case_insensitively() {
    let c = criteria(18, 100, " nairobi ");
    assert!(matches_criteria(&candidate("A", 25, Gender::Male, "NAIROBI"), &c));
    assert!(!matches_criteria(&candidate("B", 25, Gender::Male, "Nakuru"), &c));
  }

  #[test]
  fn selection_keeps_opposite_gender_in_order() {
    let alice = user("Alice", 28, Gender::Female, "Nairobi");
    let pool = vec![
      candidate("Bob", 30, Gender::Male, "Nairobi"),
      candidate("Carol", 29, Gender::Female, "Nairobi"),
      candidate("Dan", 33, Gender::Male, "Nairobi"),
      candidate("Eli", 40, Gender::Male, "Nairobi"),
    ];
    let entries = select_candidates(&alice, pool, &criteria(25, 35, "Nairobi"));
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Bob", "Dan"]);
    assert_eq!(entries[0].age, 30);
  }
}
