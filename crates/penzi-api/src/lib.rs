//! JSON REST API for Penzi.
//!
//! Exposes an axum [`Router`] backed by any [`penzi_core::store::Store`].
//! Transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(penzi_api::api_router(service.clone()))
//! ```

pub mod error;
pub mod messages;
pub mod users;

use axum::{
  Router,
  routing::{get, post},
};
use penzi_core::store::Store;
use penzi_protocol::MessageService;

pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: MessageService<S>) -> Router<()>
where
  S: Store + 'static,
{
  Router::new()
    .route("/health", get(users::health::<S>))
    // Inbound messages
    .route("/messages", post(messages::submit::<S>))
    // History
    .route("/users", get(users::list::<S>))
    .route("/users/{id}/messages", get(users::messages::<S>))
    .with_state(service)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use penzi_protocol::Engine;
  use penzi_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  async fn make_service() -> MessageService<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    MessageService::new(store, Engine::default())
  }

  async fn oneshot_json(
    service: MessageService<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = api_router(service)
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn send(
    service: &MessageService<SqliteStore>,
    contact: &str,
    text: &str,
  ) -> (StatusCode, Value) {
    oneshot_json(
      service.clone(),
      "POST",
      "/messages",
      Some(json!({ "contact": contact, "text": text })),
    )
    .await
  }

  // ── POST /messages ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn activation_returns_200_with_one_reply() {
    let service = make_service().await;
    let (status, body) = send(&service, "0711000001", "PENZI").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body.get("error").is_none());
    assert_eq!(body["replies"][0]["to"], "0711000001");
    let text = body["replies"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Welcome"), "{text}");
  }

  #[tokio::test]
  async fn rejection_returns_422_with_code() {
    let service = make_service().await;
    let (status, body) = send(&service, "0711000001", "MATCH#25-35#Nairobi").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["error"], "not_registered");
  }

  #[tokio::test]
  async fn blank_contact_returns_400() {
    let service = make_service().await;
    let (status, body) = send(&service, "  ", "PENZI").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("contact"));
  }

  #[tokio::test]
  async fn lookup_returns_push_for_target() {
    let service = make_service().await;
    for (contact, text) in [
      ("0711000001", "START#Alice#28#Female#Nairobi#Nairobi"),
      ("0711000001", "DETAILS#Diploma#Nurse#Single#Christian#Kikuyu"),
      ("0711000001", "MYSELF lovely"),
      ("0722000002", "START#Bob#30#Male#Nairobi#Nairobi"),
    ] {
      let (status, _) = send(&service, contact, text).await;
      assert_eq!(status, StatusCode::OK, "{text}");
    }

    let (status, body) = send(&service, "0722000002", "0711000001").await;
    assert_eq!(status, StatusCode::OK);
    let replies = body["replies"].as_array().unwrap();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["to"], "0722000002");
    assert_eq!(replies[1]["to"], "0711000001");
  }

  // ── History ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_reports_user_count() {
    let service = make_service().await;
    send(&service, "0711000001", "START#Alice#28#Female#Nairobi#Nairobi").await;

    let (status, body) = oneshot_json(service, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "users": 1 }));
  }

  #[tokio::test]
  async fn users_and_messages_are_listed() {
    let service = make_service().await;
    send(&service, "0711000001", "START#Alice#28#Female#Nairobi#Nairobi").await;

    let (status, users) = oneshot_json(service.clone(), "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users[0]["name"], "Alice");
    assert_eq!(users[0]["gender"], "Female");

    let id = users[0]["user_id"].as_str().unwrap();
    let (status, log) =
      oneshot_json(service, "GET", &format!("/users/{id}/messages"), None).await;
    assert_eq!(status, StatusCode::OK);
    let log = log.as_array().unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0]["direction"], "outbound");
    assert_eq!(log[1]["direction"], "inbound");
  }

  #[tokio::test]
  async fn messages_of_unknown_user_returns_404() {
    let service = make_service().await;
    let uri = format!("/users/{}/messages", uuid::Uuid::new_v4());
    let (status, _) = oneshot_json(service, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
