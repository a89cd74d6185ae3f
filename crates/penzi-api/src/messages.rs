//! Handler for `POST /messages`: the single inbound-message operation.
//!
//! | Status | Body `status` | Meaning |
//! |--------|---------------|---------|
//! | `200`  | `ok`               | Command handled |
//! | `422`  | `rejected`         | Command turned away; `error` carries the code |
//! | `500`  | `internal_failure` | Store failed; nothing was committed |
//! | `400`  | n/a                | Blank contact |

use axum::{Json, extract::State, http::StatusCode};
use penzi_core::store::Store;
use penzi_protocol::{MessageService, OutboundMessage, Status};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
  pub contact: String,
  pub text:    String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
  pub status:  &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:   Option<&'static str>,
  pub replies: Vec<OutboundMessage>,
}

/// `POST /messages` with body `{"contact":"0722010203","text":"PENZI"}`
pub async fn submit<S>(
  State(service): State<MessageService<S>>,
  Json(body): Json<SubmitBody>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError>
where
  S: Store + 'static,
{
  if body.contact.trim().is_empty() {
    return Err(ApiError::BadRequest("contact must not be blank".to_string()));
  }

  let exchange = service.submit(&body.contact, &body.text).await;
  let code = match exchange.status {
    Status::Ok => StatusCode::OK,
    Status::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
    Status::InternalFailure => StatusCode::INTERNAL_SERVER_ERROR,
  };

  Ok((
    code,
    Json(SubmitResponse {
      status:  exchange.status.as_str(),
      error:   exchange.rejection().map(|r| r.code()),
      replies: exchange.replies,
    }),
  ))
}
