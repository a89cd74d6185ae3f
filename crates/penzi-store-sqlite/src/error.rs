//! Error type for `penzi-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] penzi_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("column {column} out of range: {value}")]
  OutOfRange { column: &'static str, value: i64 },

  /// The batch cursor moved between read and update.
  #[error("match batch {0} cursor changed concurrently")]
  StaleCursor(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
