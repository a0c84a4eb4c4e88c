use serde::Deserialize;
use tracing::{debug, info};

use crate::client::GithubClient;
use crate::config::{Config, DeploymentTarget};
use crate::error::Result;
use crate::git::{Repository, Tag};
use crate::output::Outputs;

/// How many deployment records are inspected.
pub const DEPLOYMENT_HISTORY: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentState {
  Abandoned,
  Active,
  Destroyed,
  Error,
  Failure,
  Inactive,
  Pending,
  Queued,
  InProgress,
  Waiting,
  #[serde(other)]
  Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
  pub state: DeploymentState,
  pub sha: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitContext {
  pub deployment_ref: String,
  pub current_commit_tag: Option<Tag>,
  pub previous_tag: Option<Tag>,
  /// `None` until an active deployment or the history fallback supplies one.
  pub previous_deployment_sha: Option<String>,
}

impl GitContext {
  /// `previous_tag_sha` is the commit the previous tag points at, not the
  /// id of an annotated tag object.
  pub fn write_outputs(&self, outputs: &mut Outputs) {
    outputs.set("deployment_ref", &self.deployment_ref);
    outputs.set("current_commit_tag", tag_name(&self.current_commit_tag));
    outputs.set("previous_tag", tag_name(&self.previous_tag));
    outputs.set(
      "previous_tag_sha",
      self.previous_tag.as_ref().map(|tag| tag.sha.as_str()).unwrap_or_default(),
    );
    outputs.set(
      "previous_deployment_sha",
      self.previous_deployment_sha.as_deref().unwrap_or_default(),
    );
  }
}

fn tag_name(tag: &Option<Tag>) -> &str {
  tag.as_ref().map(|tag| tag.name.as_str()).unwrap_or_default()
}

pub fn current_commit_tag<'a>(tags: &'a [Tag], head: &str) -> Option<&'a Tag> {
  tags.iter().find(|tag| tag.sha == head)
}

/// The last tag not pointing at `head`, provided there are at least three such tags.
pub fn previous_tag<'a>(tags: &'a [Tag], head: &str) -> Option<&'a Tag> {
  let others: Vec<_> = tags.iter().filter(|tag| tag.sha != head).collect();

  if others.len() > 2 {
    others.last().copied()
  } else {
    None
  }
}

/// Commit of the last active deployment in the given order.
pub fn last_active_deployment(deployments: &[Deployment]) -> Option<String> {
  deployments.iter().fold(None, |candidate, deployment| {
    match (&deployment.state, &deployment.sha) {
      (DeploymentState::Active, Some(sha)) => Some(sha.clone()),
      _ => candidate,
    }
  })
}

pub fn deployment_ref(
  head_branch: Option<&str>,
  current_commit_tag: Option<&Tag>,
  github_ref: Option<&str>,
) -> String {
  match (head_branch, current_commit_tag) {
    (Some(branch), _) => branch.to_string(),
    (None, Some(tag)) => format!("refs/tags/{}", tag.name),
    (None, None) => github_ref.unwrap_or_default().to_string(),
  }
}

/// Combines local tags with the remote deployment history.
///
/// Does not touch the working copy: when no active deployment exists
/// `previous_deployment_sha` stays `None` and the caller decides how to fill it.
pub async fn resolve(
  repo: &Repository,
  client: &GithubClient,
  config: &Config,
  target: &DeploymentTarget,
  head_branch: Option<&str>,
) -> Result<GitContext> {
  let head = repo.head_commit().await?;
  let tags = repo.tags().await?;
  debug!(%head, tags = tags.len(), "read local tags");

  let current_commit_tag = current_commit_tag(&tags, &head).cloned();
  let previous_tag = previous_tag(&tags, &head).cloned();

  let deployments = client.deployments(target, DEPLOYMENT_HISTORY).await?;
  let previous_deployment_sha = last_active_deployment(&deployments);
  info!(
    environment = %target.environment,
    deployments = deployments.len(),
    previous = previous_deployment_sha.as_deref().unwrap_or("none"),
    "inspected deployment history"
  );

  Ok(GitContext {
    deployment_ref: deployment_ref(
      head_branch,
      current_commit_tag.as_ref(),
      config.github_ref.as_deref(),
    ),
    current_commit_tag,
    previous_tag,
    previous_deployment_sha,
  })
}

/// Oldest commit reachable from HEAD, taken as the last entry of the newest-first history.
pub async fn first_commit(repo: &Repository) -> Result<Option<String>> {
  Ok(repo.commits("HEAD").await?.pop())
}
