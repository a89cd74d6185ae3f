//! Integration tests for `SqliteStore` against an in-memory database.

use penzi_core::{
  matching::{AgeRange, MatchEntry, NewMatchQuery, QueryStatus},
  message::Direction,
  store::{Repository, Store},
  user::{Gender, NewUser, ProfileDetails, User},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_user(name: &str, age: u8, gender: Gender, county: &str) -> NewUser {
  NewUser {
    name: name.to_string(),
    age,
    gender,
    county: county.to_string(),
    town: "Town".to_string(),
  }
}

fn register(
  repo: &mut dyn Repository<Error = Error>,
  contact: &str,
  input: NewUser,
) -> Result<User, Error> {
  let user = repo.create_user(input)?;
  repo.bind_contact(contact, user.user_id)?;
  Ok(user)
}

fn entry(name: &str, age: u8, contact: &str) -> MatchEntry {
  MatchEntry {
    name: name.to_string(),
    age,
    contact: contact.to_string(),
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user() {
  let s = store().await;

  let user = s
    .transaction(|repo| repo.create_user(new_user("Jane", 24, Gender::Female, "Nairobi")))
    .await
    .unwrap();
  assert_eq!(user.name, "Jane");
  assert_eq!(user.gender, Gender::Female);

  let id = user.user_id;
  let fetched = s.transaction(move |repo| repo.get_user(id)).await.unwrap();
  assert_eq!(fetched, Some(user));
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  let result = s
    .transaction(|repo| repo.get_user(Uuid::new_v4()))
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn find_user_by_name_prefers_latest() {
  let s = store().await;

  let second = s
    .transaction(|repo| {
      repo.create_user(new_user("Ann", 30, Gender::Female, "Kisumu"))?;
      repo.create_user(new_user("Ann", 41, Gender::Female, "Nakuru"))
    })
    .await
    .unwrap();

  let found = s
    .transaction(|repo| repo.find_user_by_name("Ann"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.user_id, second.user_id);

  let missing = s
    .transaction(|repo| repo.find_user_by_name("ann"))
    .await
    .unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn list_users_in_registration_order() {
  let s = store().await;
  s.transaction(|repo| {
    repo.create_user(new_user("A", 20, Gender::Male, "X"))?;
    repo.create_user(new_user("B", 21, Gender::Female, "X"))?;
    repo.create_user(new_user("C", 22, Gender::Male, "X"))
  })
  .await
  .unwrap();

  let users = s.transaction(|repo| repo.list_users()).await.unwrap();
  let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
  assert_eq!(names, ["A", "B", "C"]);
  assert_eq!(s.transaction(|repo| repo.count_users()).await.unwrap(), 3);
}

// ─── Contact bindings ────────────────────────────────────────────────────────

#[tokio::test]
async fn latest_binding_wins_for_reused_contact() {
  let s = store().await;

  let (first, second) = s
    .transaction(|repo| {
      let a = register(repo, "+254700000001", new_user("A", 20, Gender::Male, "X"))?;
      let b = register(repo, "+254700000001", new_user("B", 25, Gender::Male, "X"))?;
      Ok((a, b))
    })
    .await
    .unwrap();

  let binding = s
    .transaction(|repo| repo.latest_binding("+254700000001"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(binding.user_id, second.user_id);

  let first_id = first.user_id;
  let owned = s
    .transaction(move |repo| repo.binding_for_user(first_id))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(owned.contact, "+254700000001");
}

#[tokio::test]
async fn suffix_lookup_ignores_prefix_form() {
  let s = store().await;

  let user = s
    .transaction(|repo| {
      register(repo, "+254722010203", new_user("Kim", 28, Gender::Male, "Mombasa"))
    })
    .await
    .unwrap();

  let found = s
    .transaction(|repo| repo.find_binding_by_suffix("722010203"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.user_id, user.user_id);

  let miss = s
    .transaction(|repo| repo.find_binding_by_suffix("799999999"))
    .await
    .unwrap();
  assert!(miss.is_none());
}

#[tokio::test]
async fn empty_suffix_matches_nothing() {
  let s = store().await;
  s.transaction(|repo| register(repo, "0722010203", new_user("Kim", 28, Gender::Male, "X")))
    .await
    .unwrap();

  let found = s
    .transaction(|repo| repo.find_binding_by_suffix(""))
    .await
    .unwrap();
  assert!(found.is_none());
}

// ─── Profile records ─────────────────────────────────────────────────────────

#[tokio::test]
async fn details_upsert_replaces_previous_values() {
  let s = store().await;

  let details = s
    .transaction(|repo| {
      let user = repo.create_user(new_user("Jane", 24, Gender::Female, "Nairobi"))?;
      let mut details = ProfileDetails {
        education:      "Diploma".into(),
        profession:     "Nurse".into(),
        marital_status: "Single".into(),
        religion:       "Christian".into(),
        ethnicity:      "Luo".into(),
      };
      repo.upsert_details(user.user_id, &details)?;
      details.profession = "Doctor".into();
      repo.upsert_details(user.user_id, &details)?;
      repo.get_details(user.user_id)
    })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(details.profession, "Doctor");
  assert_eq!(details.education, "Diploma");
}

#[tokio::test]
async fn description_upsert_keeps_one_row() {
  let s = store().await;

  let description = s
    .transaction(|repo| {
      let user = repo.create_user(new_user("Jane", 24, Gender::Female, "Nairobi"))?;
      repo.upsert_description(user.user_id, "first")?;
      repo.upsert_description(user.user_id, "tall and kind")?;
      repo.get_description(user.user_id)
    })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(description.text, "tall and kind");
}

// ─── Interaction log ─────────────────────────────────────────────────────────

#[tokio::test]
async fn messages_list_newest_first() {
  let s = store().await;

  let messages = s
    .transaction(|repo| {
      let user = repo.create_user(new_user("Jane", 24, Gender::Female, "Nairobi"))?;
      repo.append_message(user.user_id, Direction::Inbound, "PENZI")?;
      repo.append_message(user.user_id, Direction::Outbound, "Welcome")?;
      repo.list_messages(user.user_id)
    })
    .await
    .unwrap();

  assert_eq!(messages.len(), 2);
  assert_eq!(messages[0].direction, Direction::Outbound);
  assert_eq!(messages[1].text, "PENZI");
}

#[tokio::test]
async fn outbound_messages_with_prefix_newest_first() {
  let s = store().await;

  let found = s
    .transaction(|repo| {
      let user = repo.create_user(new_user("Jane", 24, Gender::Female, "Nairobi"))?;
      let id = user.user_id;
      repo.append_message(id, Direction::Outbound, "Hi Jane, a man called Kim asked.")?;
      repo.append_message(id, Direction::Outbound, "Hi Jane, a man called Tom asked.")?;
      repo.append_message(id, Direction::Outbound, "Tom says Hi Jane, ")?;
      repo.append_message(id, Direction::Inbound, "Hi Jane, from myself")?;
      repo.outbound_messages_with_prefix(id, "Hi Jane, ")
    })
    .await
    .unwrap();

  let texts: Vec<&str> = found.iter().map(|m| m.text.as_str()).collect();
  assert_eq!(texts, [
    "Hi Jane, a man called Tom asked.",
    "Hi Jane, a man called Kim asked.",
  ]);
}

// ─── Matching ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn candidates_filtered_by_gender_with_latest_contact() {
  let s = store().await;

  s.transaction(|repo| {
    let a = register(repo, "0700000001", new_user("A", 25, Gender::Female, "Kisumu"))?;
    register(repo, "0700000002", new_user("B", 26, Gender::Male, "Kisumu"))?;
    register(repo, "0700000003", new_user("C", 27, Gender::Female, "Nakuru"))?;
    repo.bind_contact("0700000009", a.user_id)?;
    // No binding, never a candidate.
    repo.create_user(new_user("D", 28, Gender::Female, "Kisumu"))?;
    Ok(())
  })
  .await
  .unwrap();

  let candidates = s
    .transaction(|repo| repo.list_candidates(Gender::Female))
    .await
    .unwrap();
  let seen: Vec<_> = candidates
    .iter()
    .map(|c| (c.user.name.as_str(), c.contact.as_str()))
    .collect();
  assert_eq!(seen, [("A", "0700000009"), ("C", "0700000003")]);
}

#[tokio::test]
async fn match_queries_listed_oldest_first() {
  let s = store().await;

  let queries = s
    .transaction(|repo| {
      let user = repo.create_user(new_user("Jane", 24, Gender::Female, "Nairobi"))?;
      repo.record_match_query(NewMatchQuery {
        user_id:   user.user_id,
        age_range: AgeRange::WIDE,
        location:  "Nairobi".into(),
        status:    QueryStatus::Initial,
      })?;
      repo.record_match_query(NewMatchQuery {
        user_id:   user.user_id,
        age_range: AgeRange { min: 23, max: 25 },
        location:  "Kisumu".into(),
        status:    QueryStatus::Matched,
      })?;
      repo.list_match_queries(user.user_id)
    })
    .await
    .unwrap();

  assert_eq!(queries.len(), 2);
  assert_eq!(queries[0].status, QueryStatus::Initial);
  assert_eq!(queries[1].age_range, AgeRange { min: 23, max: 25 });
}

#[tokio::test]
async fn batch_cursor_advances_and_exhausts() {
  let s = store().await;

  let user_id = s
    .transaction(|repo| {
      let user = repo.create_user(new_user("Jane", 24, Gender::Female, "Nairobi"))?;
      let query = repo.record_match_query(NewMatchQuery {
        user_id:   user.user_id,
        age_range: AgeRange::WIDE,
        location:  "Nairobi".into(),
        status:    QueryStatus::Matched,
      })?;
      let entries = vec![
        entry("A", 25, "0700000001"),
        entry("B", 26, "0700000002"),
        entry("C", 27, "0700000003"),
        entry("D", 28, "0700000004"),
      ];
      let batch = repo.create_batch(query.query_id, user.user_id, entries)?;
      assert_eq!(batch.total, 4);
      assert_eq!(batch.shown, 0);
      Ok(user.user_id)
    })
    .await
    .unwrap();

  let batch = s
    .transaction(move |repo| {
      let batch = repo.latest_pending_batch(user_id)?.expect("pending batch");
      repo.advance_batch(batch.batch_id, 0, 3)?;
      repo.latest_pending_batch(user_id)
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(batch.shown, 3);
  assert_eq!(batch.next_page(3), [entry("D", 28, "0700000004")]);

  let pending = s
    .transaction(move |repo| {
      repo.advance_batch(batch.batch_id, 3, 4)?;
      repo.latest_pending_batch(user_id)
    })
    .await
    .unwrap();
  assert!(pending.is_none());
}

#[tokio::test]
async fn stale_cursor_is_rejected() {
  let s = store().await;

  let err = s
    .transaction(|repo| {
      let user = repo.create_user(new_user("Jane", 24, Gender::Female, "Nairobi"))?;
      let query = repo.record_match_query(NewMatchQuery {
        user_id:   user.user_id,
        age_range: AgeRange::WIDE,
        location:  "Nairobi".into(),
        status:    QueryStatus::Matched,
      })?;
      let batch = repo.create_batch(
        query.query_id,
        user.user_id,
        vec![entry("A", 25, "0700000001"), entry("B", 26, "0700000002")],
      )?;
      repo.advance_batch(batch.batch_id, 0, 1)?;
      repo.advance_batch(batch.batch_id, 0, 2)
    })
    .await
    .unwrap_err();

  assert!(matches!(err, Error::StaleCursor(_)));
}

#[tokio::test]
async fn cursor_cannot_pass_total() {
  let s = store().await;

  let err = s
    .transaction(|repo| {
      let user = repo.create_user(new_user("Jane", 24, Gender::Female, "Nairobi"))?;
      let query = repo.record_match_query(NewMatchQuery {
        user_id:   user.user_id,
        age_range: AgeRange::WIDE,
        location:  "Nairobi".into(),
        status:    QueryStatus::Matched,
      })?;
      let batch = repo.create_batch(
        query.query_id,
        user.user_id,
        vec![entry("A", 25, "0700000001")],
      )?;
      repo.advance_batch(batch.batch_id, 0, 2)
    })
    .await
    .unwrap_err();

  assert!(matches!(err, Error::StaleCursor(_)));
}

// ─── Transactions ────────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_transaction_rolls_back() {
  let s = store().await;

  let result: Result<(), Error> = s
    .transaction(|repo| {
      let user = repo.create_user(new_user("Jane", 24, Gender::Female, "Nairobi"))?;
      repo.bind_contact("0700000001", user.user_id)?;
      Err(Error::StaleCursor(Uuid::nil()))
    })
    .await;
  assert!(result.is_err());

  assert_eq!(s.transaction(|repo| repo.count_users()).await.unwrap(), 0);
  let binding = s
    .transaction(|repo| repo.latest_binding("0700000001"))
    .await
    .unwrap();
  assert!(binding.is_none());
}

#[tokio::test]
async fn store_reopens_from_file() {
  let dir = std::env::temp_dir().join(format!("penzi-{}", Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("penzi.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.transaction(|repo| repo.create_user(new_user("Jane", 24, Gender::Female, "X")))
      .await
      .unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.transaction(|repo| repo.count_users()).await.unwrap(), 1);
  std::fs::remove_dir_all(&dir).ok();
}
