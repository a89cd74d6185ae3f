//! [`SqliteStore`]: the SQLite implementation of [`Store`].

use std::path::Path;

use penzi_core::store::{Repository, Store};

use crate::{Error, Result, repo::SqliteRepository, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Penzi store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All access
/// is serialized on the connection's worker thread, so two transactions never
/// interleave.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Store impl ──────────────────────────────────────────────────────────────

impl Store for SqliteStore {
  type Error = Error;

  async fn transaction<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut dyn Repository<Error = Error>) -> Result<T> + Send + 'static,
  {
    let result = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let result = {
          let mut repo = SqliteRepository::new(&tx);
          let repo: &mut dyn Repository<Error = Error> = &mut repo;
          f(repo)
        };
        // Dropping an uncommitted transaction rolls it back.
        if result.is_ok() {
          tx.commit()?;
        }
        Ok(result)
      })
      .await?;

    if let Err(err) = &result {
      tracing::debug!(error = %err, "transaction rolled back");
    }
    result
  }
}
