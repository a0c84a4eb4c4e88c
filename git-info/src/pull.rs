use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::client::{GithubClient, PullRequestRecord};
use crate::error::{Error, Lookup, Reason, Result};
use crate::output::Outputs;

static PULL_URL: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^https://(?:api\.)?[^/]+/(?:repos/)?(?P<owner>[^/]+)/(?P<repo>[^/]+)/pulls?/(?P<number>\d+)")
    .expect("pull request pattern compiles")
});

/// Coordinates of a pull request parsed from its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRef {
  pub owner: String,
  pub repo: String,
  pub number: u64,
}

impl PullRef {
  /// Accepts both web (`github.com/o/r/pull/1`) and API (`api.github.com/repos/o/r/pulls/1`) URLs.
  pub fn parse(url: &str) -> Option<Self> {
    let captures = PULL_URL.captures(url)?;

    Some(Self {
      owner: captures["owner"].to_string(),
      repo: captures["repo"].to_string(),
      number: captures["number"].parse().ok()?,
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
  pub base_branch: String,
  pub base_sha: String,
  pub base_repo_url: String,
  pub head_branch: String,
  pub head_sha: String,
  pub head_repo_url: String,
  pub is_mergeable: bool,
}

impl From<PullRequestRecord> for PullRequestInfo {
  fn from(record: PullRequestRecord) -> Self {
    Self {
      is_mergeable: !record.merged && record.mergeable.unwrap_or(false),
      base_branch: record.base.ref_name,
      base_sha: record.base.sha,
      base_repo_url: record.base.repo.map(|repo| repo.clone_url).unwrap_or_default(),
      head_branch: record.head.ref_name,
      head_sha: record.head.sha,
      head_repo_url: record.head.repo.map(|repo| repo.clone_url).unwrap_or_default(),
    }
  }
}

impl PullRequestInfo {
  pub fn write_outputs(&self, outputs: &mut Outputs) {
    outputs.set("base_branch", &self.base_branch);
    outputs.set("base_sha", &self.base_sha);
    outputs.set("base_repo", &self.base_repo_url);
    outputs.set("head_branch", &self.head_branch);
    outputs.set("head_sha", &self.head_sha);
    outputs.set("head_repo", &self.head_repo_url);
    outputs.set("is_mergeable", self.is_mergeable);
  }
}

/// Looks up the pull request behind `url`.
///
/// An empty URL is a usage error. Malformed URLs and pull requests the API
/// does not know about are reported as [`Lookup::Missing`].
pub async fn resolve(client: &GithubClient, url: &str) -> Result<Lookup<PullRequestInfo>> {
  if url.is_empty() {
    return Err(Error::Usage("Invalid PR URL".to_string()));
  }

  let Some(pull) = PullRef::parse(url) else {
    warn!(url, "Failed to locate given pull request: URL not recognised");
    return Ok(Lookup::Missing(Reason::Malformed));
  };

  let Some(repository) = client.repository(&pull.owner, &pull.repo).await? else {
    warn!(owner = %pull.owner, repo = %pull.repo, "Failed to locate given pull request: repository not found");
    return Ok(Lookup::Missing(Reason::NotFound));
  };

  let Some(record) = client.pull_request(&repository.full_name, pull.number).await? else {
    warn!(repository = %repository.full_name, number = pull.number, "Failed to locate given pull request");
    return Ok(Lookup::Missing(Reason::NotFound));
  };

  let info = PullRequestInfo::from(record);
  info!(
    base = %info.base_branch,
    head = %info.head_branch,
    mergeable = info.is_mergeable,
    "resolved pull request #{}",
    pull.number
  );

  Ok(Lookup::Found(info))
}
