//! [`SqliteRepository`]: the [`Repository`] view of one open transaction.

use chrono::Utc;
use penzi_core::{
  matching::{MatchBatch, MatchEntry, MatchQuery, NewMatchQuery},
  message::{Direction, LoggedMessage},
  store::Repository,
  user::{
    Candidate, ContactBinding, Gender, NewUser, ProfileDetails,
    SelfDescription, User,
  },
};
use rusqlite::{Connection, OptionalExtension as _, params};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawBatch, RawBinding, RawCandidate, RawDescription, RawMessage, RawQuery,
    RawUser, USER_COLUMNS, contact_digits, encode_count, encode_dt,
    encode_entries, encode_uuid,
  },
};

const BINDING_COLUMNS: &str = "binding_id, contact, user_id, created_at";
const MESSAGE_COLUMNS: &str = "message_id, user_id, direction, text, recorded_at";
const BATCH_COLUMNS: &str =
  "batch_id, query_id, user_id, total, shown, match_data, created_at";

/// Borrowed access to a connection that is inside a transaction.
///
/// Constructed by [`crate::SqliteStore`]; never outlives the transaction.
pub(crate) struct SqliteRepository<'c> {
  conn: &'c Connection,
}

impl<'c> SqliteRepository<'c> {
  pub(crate) fn new(conn: &'c Connection) -> Self { Self { conn } }

  fn user_where(&self, clause: &str, param: &str) -> Result<Option<User>> {
    let sql = format!(
      "SELECT {USER_COLUMNS} FROM users u WHERE {clause} ORDER BY u.rowid DESC LIMIT 1"
    );
    self
      .conn
      .query_row(&sql, params![param], RawUser::from_row)
      .optional()?
      .map(RawUser::into_user)
      .transpose()
  }

  fn binding_where(&self, clause: &str, param: &str) -> Result<Option<ContactBinding>> {
    let sql = format!(
      "SELECT {BINDING_COLUMNS} FROM contact_bindings WHERE {clause} \
       ORDER BY rowid DESC LIMIT 1"
    );
    self
      .conn
      .query_row(&sql, params![param], RawBinding::from_row)
      .optional()?
      .map(RawBinding::into_binding)
      .transpose()
  }
}

impl Repository for SqliteRepository<'_> {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  fn create_user(&mut self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:    Uuid::new_v4(),
      name:       input.name,
      age:        input.age,
      gender:     input.gender,
      county:     input.county,
      town:       input.town,
      created_at: Utc::now(),
    };

    self.conn.execute(
      "INSERT INTO users (user_id, name, age, gender, county, town, created_at)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
      params![
        encode_uuid(user.user_id),
        user.name,
        user.age,
        user.gender.as_str(),
        user.county,
        user.town,
        encode_dt(user.created_at),
      ],
    )?;

    tracing::debug!(user_id = %user.user_id, "created user");
    Ok(user)
  }

  fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self.user_where("u.user_id = ?1", &encode_uuid(id))
  }

  fn find_user_by_name(&self, name: &str) -> Result<Option<User>> {
    self.user_where("u.name = ?1", name)
  }

  fn list_users(&self) -> Result<Vec<User>> {
    let mut stmt = self
      .conn
      .prepare(&format!("SELECT {USER_COLUMNS} FROM users u ORDER BY u.rowid"))?;
    let raws = stmt
      .query_map([], RawUser::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(RawUser::into_user).collect()
  }

  fn count_users(&self) -> Result<usize> {
    let n: i64 = self
      .conn
      .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?;
    Ok(usize::try_from(n).unwrap_or_default())
  }

  // ── Contact bindings ──────────────────────────────────────────────────────

  fn bind_contact(&mut self, contact: &str, user_id: Uuid) -> Result<ContactBinding> {
    let binding = ContactBinding {
      binding_id: Uuid::new_v4(),
      contact: contact.to_string(),
      user_id,
      created_at: Utc::now(),
    };

    self.conn.execute(
      "INSERT INTO contact_bindings (binding_id, contact, digits, user_id, created_at)
       VALUES (?1, ?2, ?3, ?4, ?5)",
      params![
        encode_uuid(binding.binding_id),
        binding.contact,
        contact_digits(contact),
        encode_uuid(user_id),
        encode_dt(binding.created_at),
      ],
    )?;

    Ok(binding)
  }

  fn latest_binding(&self, contact: &str) -> Result<Option<ContactBinding>> {
    self.binding_where("contact = ?1", contact)
  }

  fn binding_for_user(&self, user_id: Uuid) -> Result<Option<ContactBinding>> {
    self.binding_where("user_id = ?1", &encode_uuid(user_id))
  }

  fn find_binding_by_suffix(&self, digits: &str) -> Result<Option<ContactBinding>> {
    // An empty pattern would match every row.
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
      return Ok(None);
    }
    self.binding_where("digits LIKE '%' || ?1", digits)
  }

  // ── Profile records ───────────────────────────────────────────────────────

  fn upsert_details(&mut self, user_id: Uuid, details: &ProfileDetails) -> Result<()> {
    self.conn.execute(
      "INSERT INTO profile_details (
         user_id, education, profession, marital_status, religion, ethnicity,
         updated_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
       ON CONFLICT (user_id) DO UPDATE SET
         education      = excluded.education,
         profession     = excluded.profession,
         marital_status = excluded.marital_status,
         religion       = excluded.religion,
         ethnicity      = excluded.ethnicity,
         updated_at     = excluded.updated_at",
      params![
        encode_uuid(user_id),
        details.education,
        details.profession,
        details.marital_status,
        details.religion,
        details.ethnicity,
        encode_dt(Utc::now()),
      ],
    )?;
    Ok(())
  }

  fn get_details(&self, user_id: Uuid) -> Result<Option<ProfileDetails>> {
    Ok(
      self
        .conn
        .query_row(
          "SELECT education, profession, marital_status, religion, ethnicity
           FROM profile_details WHERE user_id = ?1",
          params![encode_uuid(user_id)],
          |row| {
            Ok(ProfileDetails {
              education:      row.get(0)?,
              profession:     row.get(1)?,
              marital_status: row.get(2)?,
              religion:       row.get(3)?,
              ethnicity:      row.get(4)?,
            })
          },
        )
        .optional()?,
    )
  }

  fn upsert_description(&mut self, user_id: Uuid, text: &str) -> Result<SelfDescription> {
    let description = SelfDescription {
      user_id,
      text: text.to_string(),
      updated_at: Utc::now(),
    };

    self.conn.execute(
      "INSERT INTO self_descriptions (user_id, description, updated_at)
       VALUES (?1, ?2, ?3)
       ON CONFLICT (user_id) DO UPDATE SET
         description = excluded.description,
         updated_at  = excluded.updated_at",
      params![
        encode_uuid(user_id),
        description.text,
        encode_dt(description.updated_at),
      ],
    )?;

    Ok(description)
  }

  fn get_description(&self, user_id: Uuid) -> Result<Option<SelfDescription>> {
    self
      .conn
      .query_row(
        "SELECT user_id, description, updated_at
         FROM self_descriptions WHERE user_id = ?1",
        params![encode_uuid(user_id)],
        |row| {
          Ok(RawDescription {
            user_id:    row.get(0)?,
            text:       row.get(1)?,
            updated_at: row.get(2)?,
          })
        },
      )
      .optional()?
      .map(RawDescription::into_description)
      .transpose()
  }

  // ── Interaction log ───────────────────────────────────────────────────────

  fn append_message(
    &mut self,
    user_id: Uuid,
    direction: Direction,
    text: &str,
  ) -> Result<LoggedMessage> {
    let message = LoggedMessage {
      message_id: Uuid::new_v4(),
      user_id,
      direction,
      text: text.to_string(),
      recorded_at: Utc::now(),
    };

    self.conn.execute(
      "INSERT INTO messages (message_id, user_id, direction, text, recorded_at)
       VALUES (?1, ?2, ?3, ?4, ?5)",
      params![
        encode_uuid(message.message_id),
        encode_uuid(user_id),
        direction.as_str(),
        message.text,
        encode_dt(message.recorded_at),
      ],
    )?;

    Ok(message)
  }

  fn list_messages(&self, user_id: Uuid) -> Result<Vec<LoggedMessage>> {
    let mut stmt = self.conn.prepare(&format!(
      "SELECT {MESSAGE_COLUMNS} FROM messages WHERE user_id = ?1 ORDER BY rowid DESC"
    ))?;
    let raws = stmt
      .query_map(params![encode_uuid(user_id)], RawMessage::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(RawMessage::into_message).collect()
  }

  fn outbound_messages_with_prefix(
    &self,
    user_id: Uuid,
    prefix: &str,
  ) -> Result<Vec<LoggedMessage>> {
    let mut stmt = self.conn.prepare(&format!(
      "SELECT {MESSAGE_COLUMNS} FROM messages
       WHERE user_id = ?1 AND direction = 'outbound'
         AND substr(text, 1, length(?2)) = ?2
       ORDER BY rowid DESC"
    ))?;
    let raws = stmt
      .query_map(params![encode_uuid(user_id), prefix], RawMessage::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(RawMessage::into_message).collect()
  }

  // ── Matching ──────────────────────────────────────────────────────────────

  fn record_match_query(&mut self, input: NewMatchQuery) -> Result<MatchQuery> {
    let query = MatchQuery {
      query_id:   Uuid::new_v4(),
      user_id:    input.user_id,
      age_range:  input.age_range,
      location:   input.location,
      status:     input.status,
      created_at: Utc::now(),
    };

    self.conn.execute(
      "INSERT INTO match_queries (query_id, user_id, age_range, location, status, created_at)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
      params![
        encode_uuid(query.query_id),
        encode_uuid(query.user_id),
        query.age_range.encode(),
        query.location,
        query.status.as_str(),
        encode_dt(query.created_at),
      ],
    )?;

    Ok(query)
  }

  fn list_match_queries(&self, user_id: Uuid) -> Result<Vec<MatchQuery>> {
    let mut stmt = self.conn.prepare(
      "SELECT query_id, user_id, age_range, location, status, created_at
       FROM match_queries WHERE user_id = ?1 ORDER BY rowid",
    )?;
    let raws = stmt
      .query_map(params![encode_uuid(user_id)], |row| {
        Ok(RawQuery {
          query_id:   row.get(0)?,
          user_id:    row.get(1)?,
          age_range:  row.get(2)?,
          location:   row.get(3)?,
          status:     row.get(4)?,
          created_at: row.get(5)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(RawQuery::into_query).collect()
  }

  fn list_candidates(&self, gender: Gender) -> Result<Vec<Candidate>> {
    let mut stmt = self.conn.prepare(&format!(
      "SELECT {USER_COLUMNS}, b.contact
       FROM users u
       JOIN contact_bindings b ON b.rowid = (
         SELECT MAX(rowid) FROM contact_bindings WHERE user_id = u.user_id
       )
       WHERE u.gender = ?1
       ORDER BY u.rowid"
    ))?;
    let raws = stmt
      .query_map(params![gender.as_str()], |row| {
        Ok(RawCandidate {
          user:    RawUser::from_row(row)?,
          contact: row.get(7)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(RawCandidate::into_candidate).collect()
  }

  fn create_batch(
    &mut self,
    query_id: Uuid,
    user_id: Uuid,
    entries: Vec<MatchEntry>,
  ) -> Result<MatchBatch> {
    let batch = MatchBatch {
      batch_id: Uuid::new_v4(),
      query_id,
      user_id,
      total: entries.len(),
      shown: 0,
      entries,
      created_at: Utc::now(),
    };

    self.conn.execute(
      "INSERT INTO match_batches (
         batch_id, query_id, user_id, total, shown, match_data, created_at
       ) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)",
      params![
        encode_uuid(batch.batch_id),
        encode_uuid(query_id),
        encode_uuid(user_id),
        encode_count("total", batch.total)?,
        encode_entries(&batch.entries)?,
        encode_dt(batch.created_at),
      ],
    )?;

    Ok(batch)
  }

  fn latest_pending_batch(&self, user_id: Uuid) -> Result<Option<MatchBatch>> {
    self
      .conn
      .query_row(
        &format!(
          "SELECT {BATCH_COLUMNS} FROM match_batches
           WHERE user_id = ?1 AND shown < total
           ORDER BY rowid DESC LIMIT 1"
        ),
        params![encode_uuid(user_id)],
        RawBatch::from_row,
      )
      .optional()?
      .map(RawBatch::into_batch)
      .transpose()
  }

  fn advance_batch(
    &mut self,
    batch_id: Uuid,
    expected_shown: usize,
    new_shown: usize,
  ) -> Result<()> {
    let changed = self.conn.execute(
      "UPDATE match_batches SET shown = ?3
       WHERE batch_id = ?1 AND shown = ?2 AND ?3 >= shown AND ?3 <= total",
      params![
        encode_uuid(batch_id),
        encode_count("shown", expected_shown)?,
        encode_count("shown", new_shown)?,
      ],
    )?;

    if changed == 0 {
      return Err(Error::StaleCursor(batch_id));
    }
    Ok(())
  }
}
