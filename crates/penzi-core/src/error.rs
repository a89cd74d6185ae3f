//! Error types for `penzi-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown gender: {0:?}")]
  UnknownGender(String),

  #[error("unknown message direction: {0:?}")]
  UnknownDirection(String),

  #[error("unknown match query status: {0:?}")]
  UnknownQueryStatus(String),

  #[error("malformed age range: {0:?}")]
  MalformedAgeRange(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
