//! [`Engine`]: the single dispatcher over every command.

use penzi_command::{Command, Formatter, Rejection};
use penzi_core::{message::Direction, store::Repository, user::User};
use tracing::{debug, warn};

use crate::{
  Exchange, OutboundMessage, Status, consent, matching, pagination,
  registration, resolver,
};

/// Default number of match entries per page.
pub const DEFAULT_PAGE_SIZE: usize = 3;

/// A handler's result: storage errors on the outside, rejections inside.
pub(crate) type Handled<E> = Result<Result<Reply, Rejection>, E>;

/// What a handler sends back to the caller, plus an optional push to a third
/// party that the handler has already logged.
pub(crate) struct Reply {
  pub text: String,
  pub push: Option<OutboundMessage>,
}

impl Reply {
  pub fn text(text: String) -> Self { Self { text, push: None } }
}

/// Stateless protocol engine.
///
/// All state lives in the repository passed to [`Engine::handle`].
#[derive(Debug, Clone)]
pub struct Engine {
  formatter: Formatter,
  page_size: usize,
}

impl Default for Engine {
  fn default() -> Self { Self::new(Formatter::default(), DEFAULT_PAGE_SIZE) }
}

impl Engine {
  pub fn new(formatter: Formatter, page_size: usize) -> Self {
    Self {
      formatter,
      page_size: page_size.max(1),
    }
  }

  pub fn formatter(&self) -> &Formatter { &self.formatter }

  /// Handle one inbound message from `contact`.
  ///
  /// Rejections come back as [`Status::Rejected`]; only storage failures are
  /// returned as `Err`. When the sender resolves to a user after handling,
  /// the inbound text and the reply are appended to that user's log.
  pub fn handle<R>(
    &self,
    repo: &mut R,
    contact: &str,
    text: &str,
  ) -> Result<Exchange, R::Error>
  where
    R: Repository + ?Sized,
  {
    let command = penzi_command::parse(text);
    let kind = command.kind();
    let caller = resolver::resolve(&*repo, contact)?;
    debug!(
      contact,
      command = kind.as_str(),
      registered = caller.is_some(),
      "dispatching message"
    );

    let (status, reply) = match self.dispatch(repo, contact, caller, command)? {
      Ok(reply) => (Status::Ok, reply),
      Err(rejection) => {
        warn!(
          contact,
          command = kind.as_str(),
          code = rejection.code(),
          "command rejected"
        );
        let text = self.formatter.rejection(&rejection);
        (Status::Rejected(rejection), Reply::text(text))
      }
    };

    // Resolved again so a fresh START logs against the new user.
    if let Some(owner) = resolver::resolve(&*repo, contact)? {
      repo.append_message(owner.user_id, Direction::Inbound, text)?;
      repo.append_message(owner.user_id, Direction::Outbound, &reply.text)?;
    }

    let mut replies = vec![OutboundMessage {
      to:   contact.to_string(),
      text: reply.text,
    }];
    replies.extend(reply.push);
    Ok(Exchange { status, replies })
  }

  fn dispatch<R>(
    &self,
    repo: &mut R,
    contact: &str,
    caller: Option<User>,
    command: Command,
  ) -> Handled<R::Error>
  where
    R: Repository + ?Sized,
  {
    let f = &self.formatter;
    match (command, caller) {
      (Command::Activate, _) => Ok(Ok(Reply::text(f.welcome()))),
      (Command::Unknown, _) => Ok(Err(Rejection::Unknown)),
      (Command::Register(fields), _) => {
        registration::register(repo, f, contact, fields)
      }

      // Everything below requires a registered caller.
      (_, None) => Ok(Err(Rejection::NotRegistered)),

      (Command::SubmitDetails(fields), Some(user)) => {
        registration::submit_details(repo, f, &user, fields)
      }
      (Command::SubmitDescription(text), Some(user)) => {
        registration::submit_description(repo, f, &user, &text)
      }
      (Command::MatchQuery(criteria), Some(user)) => {
        matching::run(repo, f, self.page_size, &user, criteria)
      }
      (Command::NextPage, Some(user)) => {
        pagination::next(repo, f, self.page_size, &user)
      }
      (Command::ProfileLookup(phone), Some(user)) => {
        consent::lookup(repo, f, &user, &phone)
      }
      (Command::Describe(phone), Some(_)) => consent::describe(repo, f, phone),
      (Command::Consent, Some(user)) => consent::accept(repo, f, &user),
    }
  }
}
