//! [`MessageService`]: one inbound message, one store transaction.

use std::sync::Arc;

use penzi_core::store::Store;
use tracing::error;

use crate::{Engine, Exchange, OutboundMessage, Status};

/// Runs the [`Engine`] against a [`Store`], one transaction per message.
///
/// Cloning is cheap; both fields are reference-counted.
pub struct MessageService<S> {
  store:  Arc<S>,
  engine: Arc<Engine>,
}

impl<S> Clone for MessageService<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      engine: Arc::clone(&self.engine),
    }
  }
}

impl<S: Store + 'static> MessageService<S> {
  pub fn new(store: S, engine: Engine) -> Self {
    Self {
      store:  Arc::new(store),
      engine: Arc::new(engine),
    }
  }

  pub fn store(&self) -> &S { &self.store }

  /// Handle one inbound message.
  ///
  /// All writes commit together. If the store fails, nothing is kept and
  /// the sender gets the apology with [`Status::InternalFailure`].
  pub async fn submit(&self, contact: &str, text: &str) -> Exchange {
    let contact = contact.trim().to_string();
    let engine = Arc::clone(&self.engine);
    let (who, body) = (contact.clone(), text.to_string());

    let result = self
      .store
      .transaction(move |repo| engine.handle(repo, &who, &body))
      .await;

    match result {
      Ok(exchange) => exchange,
      Err(err) => {
        error!(contact = %contact, error = %err, "message rolled back");
        Exchange {
          status:  Status::InternalFailure,
          replies: vec![OutboundMessage {
            to:   contact,
            text: self.engine.formatter().apology(),
          }],
        }
      }
    }
  }
}
