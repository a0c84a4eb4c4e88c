use tracing::{debug, warn};

use crate::error::{Lookup, Reason, Result};
use crate::git::Repository;
use crate::pull::PullRequestInfo;

pub async fn has_changes(repo: &Repository) -> Result<bool> {
  let dirty = repo.is_dirty().await?;
  debug!(path = %repo.path().display(), dirty, "checked working tree");
  Ok(dirty)
}

/// Counts commits on `origin/<base>` that `origin/<head>` does not contain.
///
/// Refs that are not available locally yield `Missing(Unresolvable)`.
pub async fn commits_behind(
  repo: &Repository,
  pull: &Lookup<PullRequestInfo>,
) -> Result<Lookup<usize>> {
  let Some(pull) = pull.as_found() else {
    warn!("no pull request to compare, assuming not behind");
    return Ok(Lookup::Missing(Reason::Unresolvable));
  };

  let base = format!("origin/{}", pull.base_branch);
  let head = format!("origin/{}", pull.head_branch);

  for rev in [&base, &head] {
    if repo.resolve_commit(rev).await?.is_none() {
      warn!(rev = %rev, "unable to resolve ref, assuming not behind");
      return Ok(Lookup::Missing(Reason::Unresolvable));
    }
  }

  let count = repo.count_between(&head, &base).await?;
  debug!(%base, %head, count, "compared branches");
  Ok(Lookup::Found(count))
}

pub fn is_behind(commits: &Lookup<usize>) -> bool {
  matches!(commits, Lookup::Found(count) if *count > 0)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unresolvable_is_not_behind() {
    assert!(!is_behind(&Lookup::Missing(Reason::Unresolvable)));
  }

  #[test]
  fn behind_only_with_commits() {
    assert!(is_behind(&Lookup::Found(2)));
    assert!(!is_behind(&Lookup::Found(0)));
  }
}
