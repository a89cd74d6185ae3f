//! START, DETAILS and MYSELF.

use penzi_command::{Formatter, Rejection};
use penzi_core::{
  matching::{AgeRange, NewMatchQuery, QueryStatus},
  phase::Phase,
  store::Repository,
  user::{NewUser, ProfileDetails, User},
};
use tracing::info;

use crate::{
  engine::{Handled, Reply},
  resolver,
};

/// Create a user, its contact binding and the default match query.
pub(crate) fn register<R>(
  repo: &mut R,
  formatter: &Formatter,
  contact: &str,
  fields: Result<NewUser, Rejection>,
) -> Handled<R::Error>
where
  R: Repository + ?Sized,
{
  let input = match fields {
    Ok(input) => input,
    Err(rejection) => return Ok(Err(rejection)),
  };

  let user = repo.create_user(input)?;
  repo.bind_contact(contact, user.user_id)?;
  repo.record_match_query(NewMatchQuery {
    user_id:   user.user_id,
    age_range: AgeRange::WIDE,
    location:  user.county.clone(),
    status:    QueryStatus::Initial,
  })?;

  info!(user_id = %user.user_id, contact, "registered user");
  Ok(Ok(Reply::text(formatter.registered(&user.name))))
}

pub(crate) fn submit_details<R>(
  repo: &mut R,
  formatter: &Formatter,
  user: &User,
  fields: Result<ProfileDetails, Rejection>,
) -> Handled<R::Error>
where
  R: Repository + ?Sized,
{
  let details = match fields {
    Ok(details) => details,
    Err(rejection) => return Ok(Err(rejection)),
  };

  repo.upsert_details(user.user_id, &details)?;
  Ok(Ok(Reply::text(formatter.details_saved())))
}

/// Only reachable once DETAILS has been stored.
pub(crate) fn submit_description<R>(
  repo: &mut R,
  formatter: &Formatter,
  user: &User,
  text: &str,
) -> Handled<R::Error>
where
  R: Repository + ?Sized,
{
  let phase = resolver::phase(&*repo, user)?;
  if phase == Phase::AwaitingDetails {
    return Ok(Err(Rejection::RegistrationIncomplete(phase)));
  }

  let text = text.trim();
  if text.is_empty() {
    return Ok(Err(Rejection::EmptyDescription));
  }

  repo.upsert_description(user.user_id, text)?;
  Ok(Ok(Reply::text(formatter.description_saved())))
}
