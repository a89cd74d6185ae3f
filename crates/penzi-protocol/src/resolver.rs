//! Caller identity and phase.

use penzi_core::{phase::Phase, store::Repository, user::User};

/// The user behind the most recent binding of `contact`, if any.
pub fn resolve<R>(repo: &R, contact: &str) -> Result<Option<User>, R::Error>
where
  R: Repository + ?Sized,
{
  let Some(binding) = repo.latest_binding(contact)? else {
    return Ok(None);
  };
  repo.get_user(binding.user_id)
}

/// Where `user` stands in the onboarding sequence.
pub fn phase<R>(repo: &R, user: &User) -> Result<Phase, R::Error>
where
  R: Repository + ?Sized,
{
  let details = repo.get_details(user.user_id)?;
  let description = repo.get_description(user.user_id)?;
  Ok(Phase::infer(Some(user), details.as_ref(), description.as_ref()))
}
