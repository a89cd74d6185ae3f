//! Profile lookup, the YES handshake and DESCRIBE.
//!
//! A lookup shows the requester the target's card and pushes a notification
//! to the target. The notification names the requester but carries no
//! contact; the target learns the full profile only by replying YES.

use penzi_command::{
  Formatter, Rejection, notification_greeting, phone_suffix, requester_name,
};
use penzi_core::{
  message::Direction,
  store::Repository,
  user::{ContactBinding, User},
};
use tracing::{debug, info};

use crate::{
  OutboundMessage,
  engine::{Handled, Reply},
};

/// The user whose bound contact ends with the digits of `phone`.
fn find_target<R>(
  repo: &R,
  phone: &str,
) -> Result<Option<(User, ContactBinding)>, R::Error>
where
  R: Repository + ?Sized,
{
  let Some(binding) = repo.find_binding_by_suffix(&phone_suffix(phone))? else {
    return Ok(None);
  };
  Ok(repo.get_user(binding.user_id)?.map(|user| (user, binding)))
}

pub(crate) fn lookup<R>(
  repo: &mut R,
  formatter: &Formatter,
  user: &User,
  phone: &str,
) -> Handled<R::Error>
where
  R: Repository + ?Sized,
{
  let Some((target, binding)) = find_target(&*repo, phone)? else {
    return Ok(Err(Rejection::TargetNotFound(phone.to_string())));
  };
  if target.gender == user.gender {
    return Ok(Err(Rejection::SameGender));
  }

  let details = repo.get_details(target.user_id)?;
  let card = formatter.profile_card(&target, details.as_ref(), &binding.contact);

  let notification = formatter.interest_notification(&target, user);
  repo.append_message(target.user_id, Direction::Outbound, &notification)?;
  info!(
    requester = %user.user_id,
    target = %target.user_id,
    "interest notification pushed"
  );

  Ok(Ok(Reply {
    text: card,
    push: Some(OutboundMessage {
      to:   binding.contact,
      text: notification,
    }),
  }))
}

/// YES: disclose the requester named in the caller's newest notification.
///
/// Only outbound entries that match the notification template in full count;
/// replies that merely quote its wording are skipped. The requester is found
/// by name, so two users sharing a name resolve to whichever registered last.
pub(crate) fn accept<R>(
  repo: &mut R,
  formatter: &Formatter,
  user: &User,
) -> Handled<R::Error>
where
  R: Repository + ?Sized,
{
  let greeted = repo
    .outbound_messages_with_prefix(user.user_id, &notification_greeting(&user.name))?;
  if greeted.is_empty() {
    return Ok(Err(Rejection::NoPendingRequest));
  }
  let Some(name) = greeted
    .iter()
    .find_map(|message| requester_name(&user.name, &message.text))
  else {
    return Ok(Err(Rejection::RequesterParsingFailed));
  };

  let Some(requester) = repo.find_user_by_name(&name)? else {
    return Ok(Err(Rejection::TargetNotFound(name)));
  };
  let Some(binding) = repo.binding_for_user(requester.user_id)? else {
    return Ok(Err(Rejection::TargetNotFound(name)));
  };

  debug!(user_id = %user.user_id, requester = %requester.user_id, "consent given");
  let details = repo.get_details(requester.user_id)?;
  Ok(Ok(Reply::text(formatter.profile_card(
    &requester,
    details.as_ref(),
    &binding.contact,
  ))))
}

pub(crate) fn describe<R>(
  repo: &mut R,
  formatter: &Formatter,
  phone: Result<String, Rejection>,
) -> Handled<R::Error>
where
  R: Repository + ?Sized,
{
  let phone = match phone {
    Ok(phone) => phone,
    Err(rejection) => return Ok(Err(rejection)),
  };

  let Some((target, _)) = find_target(&*repo, &phone)? else {
    return Ok(Err(Rejection::TargetNotFound(phone)));
  };
  let Some(description) = repo.get_description(target.user_id)? else {
    return Ok(Err(Rejection::NoDescription(target.name)));
  };

  Ok(Ok(Reply::text(formatter.description(&target, &description.text))))
}
