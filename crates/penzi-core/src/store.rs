//! The `Repository` and `Store` traits.
//!
//! [`Repository`] is the synchronous CRUD surface the protocol engine works
//! against; every call happens inside one open transaction. [`Store`] is the
//! async handle a server holds: it opens a transaction, hands a
//! `Repository` view of it to a closure, and commits only if the closure
//! returns `Ok`.
//!
//! Backends (e.g. `penzi-store-sqlite`) implement both. Higher layers depend
//! on these abstractions, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  matching::{MatchBatch, MatchEntry, MatchQuery, NewMatchQuery},
  message::{Direction, LoggedMessage},
  user::{
    Candidate, ContactBinding, Gender, NewUser, ProfileDetails,
    SelfDescription, User,
  },
};

// ─── Repository ──────────────────────────────────────────────────────────────

/// Transaction-scoped access to the relational store.
///
/// "Most recent" always means last inserted; list results come back in
/// insertion order unless stated otherwise.
pub trait Repository {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. `user_id` and `created_at` are assigned here.
  fn create_user(&mut self, input: NewUser) -> Result<User, Self::Error>;

  fn get_user(&self, id: Uuid) -> Result<Option<User>, Self::Error>;

  /// The most recently registered user with exactly this name.
  fn find_user_by_name(&self, name: &str) -> Result<Option<User>, Self::Error>;

  fn list_users(&self) -> Result<Vec<User>, Self::Error>;

  fn count_users(&self) -> Result<usize, Self::Error>;

  // ── Contact bindings ──────────────────────────────────────────────────

  fn bind_contact(
    &mut self,
    contact: &str,
    user_id: Uuid,
  ) -> Result<ContactBinding, Self::Error>;

  /// The most recent binding for exactly this contact identifier.
  fn latest_binding(
    &self,
    contact: &str,
  ) -> Result<Option<ContactBinding>, Self::Error>;

  /// The most recent binding owned by `user_id`.
  fn binding_for_user(
    &self,
    user_id: Uuid,
  ) -> Result<Option<ContactBinding>, Self::Error>;

  /// The most recent binding whose digits end with `digits`.
  fn find_binding_by_suffix(
    &self,
    digits: &str,
  ) -> Result<Option<ContactBinding>, Self::Error>;

  // ── Profile records ───────────────────────────────────────────────────

  fn upsert_details(
    &mut self,
    user_id: Uuid,
    details: &ProfileDetails,
  ) -> Result<(), Self::Error>;

  fn get_details(
    &self,
    user_id: Uuid,
  ) -> Result<Option<ProfileDetails>, Self::Error>;

  fn upsert_description(
    &mut self,
    user_id: Uuid,
    text: &str,
  ) -> Result<SelfDescription, Self::Error>;

  fn get_description(
    &self,
    user_id: Uuid,
  ) -> Result<Option<SelfDescription>, Self::Error>;

  // ── Interaction log ───────────────────────────────────────────────────

  fn append_message(
    &mut self,
    user_id: Uuid,
    direction: Direction,
    text: &str,
  ) -> Result<LoggedMessage, Self::Error>;

  /// All log entries for `user_id`, newest first.
  fn list_messages(
    &self,
    user_id: Uuid,
  ) -> Result<Vec<LoggedMessage>, Self::Error>;

  /// Outbound entries for `user_id` whose text starts with `prefix`, newest
  /// first.
  fn outbound_messages_with_prefix(
    &self,
    user_id: Uuid,
    prefix: &str,
  ) -> Result<Vec<LoggedMessage>, Self::Error>;

  // ── Matching ──────────────────────────────────────────────────────────

  fn record_match_query(
    &mut self,
    input: NewMatchQuery,
  ) -> Result<MatchQuery, Self::Error>;

  /// All match queries recorded for `user_id`, oldest first.
  fn list_match_queries(
    &self,
    user_id: Uuid,
  ) -> Result<Vec<MatchQuery>, Self::Error>;

  /// Every user of `gender` that has a contact binding, in registration
  /// order, each paired with their most recent contact.
  fn list_candidates(&self, gender: Gender) -> Result<Vec<Candidate>, Self::Error>;

  /// Persist a batch with `shown = 0` and `total = entries.len()`.
  fn create_batch(
    &mut self,
    query_id: Uuid,
    user_id: Uuid,
    entries: Vec<MatchEntry>,
  ) -> Result<MatchBatch, Self::Error>;

  /// The most recent batch for `user_id` that still has unshown entries.
  fn latest_pending_batch(
    &self,
    user_id: Uuid,
  ) -> Result<Option<MatchBatch>, Self::Error>;

  /// Move a batch cursor from `expected_shown` to `new_shown`.
  ///
  /// Fails if the stored cursor no longer equals `expected_shown`.
  fn advance_batch(
    &mut self,
    batch_id: Uuid,
    expected_shown: usize,
    new_shown: usize,
  ) -> Result<(), Self::Error>;
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An async handle to a transactional backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait Store: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Run `f` inside a single transaction.
  ///
  /// Every write `f` performs is committed if it returns `Ok` and rolled back
  /// if it returns `Err`.
  fn transaction<T, F>(
    &self,
    f: F,
  ) -> impl Future<Output = Result<T, Self::Error>> + Send + '_
  where
    T: Send + 'static,
    F: FnOnce(&mut dyn Repository<Error = Self::Error>) -> Result<T, Self::Error>
      + Send
      + 'static;
}
