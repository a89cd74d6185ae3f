//! NEXT: serve the following page of the caller's newest unfinished batch.

use penzi_command::{Formatter, Rejection};
use penzi_core::{store::Repository, user::User};

use crate::engine::{Handled, Reply};

pub(crate) fn next<R>(
  repo: &mut R,
  formatter: &Formatter,
  page_size: usize,
  user: &User,
) -> Handled<R::Error>
where
  R: Repository + ?Sized,
{
  let Some(batch) = repo.latest_pending_batch(user.user_id)? else {
    return Ok(Err(Rejection::NoPendingMatches));
  };

  let page = batch.next_page(page_size);
  let shown = batch.shown + page.len();
  repo.advance_batch(batch.batch_id, batch.shown, shown)?;

  Ok(Ok(Reply::text(formatter.next_page(
    user.gender.opposite(),
    page,
    batch.total - shown,
  ))))
}
