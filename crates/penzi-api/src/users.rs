//! Read-only handlers for users and their interaction logs.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/health` | Liveness plus the user count |
//! | `GET`  | `/users` | Registration order |
//! | `GET`  | `/users/{id}/messages` | Newest first; 404 if the user is unknown |

use axum::{
  Json,
  extract::{Path, State},
};
use penzi_core::{message::LoggedMessage, store::Store, user::User};
use penzi_protocol::MessageService;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Health ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Health {
  pub status: &'static str,
  pub users:  usize,
}

/// `GET /health`
pub async fn health<S>(
  State(service): State<MessageService<S>>,
) -> Result<Json<Health>, ApiError>
where
  S: Store + 'static,
{
  let users = service
    .store()
    .transaction(|repo| repo.count_users())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Health { status: "ok", users }))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S>(
  State(service): State<MessageService<S>>,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: Store + 'static,
{
  let users = service
    .store()
    .transaction(|repo| repo.list_users())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(users))
}

// ─── Messages ─────────────────────────────────────────────────────────────────

/// `GET /users/{id}/messages`
pub async fn messages<S>(
  State(service): State<MessageService<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<LoggedMessage>>, ApiError>
where
  S: Store + 'static,
{
  let log = service
    .store()
    .transaction(move |repo| {
      if repo.get_user(id)?.is_none() {
        return Ok(None);
      }
      repo.list_messages(id).map(Some)
    })
    .await
    .map_err(ApiError::store)?;

  log
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("user {id}")))
}
