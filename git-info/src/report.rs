//! Collects the outputs of each subcommand. Nothing is printed here, so a
//! failure part way through leaves no partial output behind.

use tracing::{debug, warn};

use crate::client::GithubClient;
use crate::config::Config;
use crate::deployment;
use crate::error::{Error, Lookup, Result};
use crate::git::Repository;
use crate::output::Outputs;
use crate::pull;
use crate::status;

/// Outputs of `info`: pull request keys when one resolves, then the deployment context.
///
/// When no active deployment exists this checks out `config.fallback_ref` in
/// `repo` and leaves it checked out.
pub async fn info(
  config: &Config,
  client: &GithubClient,
  repo: &Repository,
  pr_url: Option<&str>,
) -> Result<Outputs> {
  if pr_url == Some("") {
    return Err(Error::Usage("Invalid PR URL".to_string()));
  }

  let target = config.deployment_target()?;
  let mut outputs = Outputs::new();

  let pull = match pr_url {
    Some(url) => pull::resolve(client, url).await?.found(),
    None => None,
  };
  if let Some(pull) = &pull {
    pull.write_outputs(&mut outputs);
  }

  let head_branch = pull.as_ref().map(|pull| pull.head_branch.as_str());
  let mut context = deployment::resolve(repo, client, config, &target, head_branch).await?;

  if context.previous_deployment_sha.is_none() {
    warn!(
      fallback = %config.fallback_ref,
      "no active deployment found, using the first commit instead"
    );
    repo.checkout(&config.fallback_ref).await?;
    context.previous_deployment_sha = deployment::first_commit(repo).await?;
  }

  context.write_outputs(&mut outputs);
  Ok(outputs)
}

pub async fn has_changes(repo: &Repository) -> Result<Outputs> {
  let mut outputs = Outputs::new();
  outputs.set("has_changes", status::has_changes(repo).await?);
  Ok(outputs)
}

pub async fn is_behind(client: &GithubClient, repo: &Repository, pr_url: &str) -> Result<Outputs> {
  let pull = pull::resolve(client, pr_url).await?;
  let commits = status::commits_behind(repo, &pull).await?;

  if let Lookup::Found(count) = &commits {
    debug!(count, "base commits missing from head");
  }

  let mut outputs = Outputs::new();
  outputs.set("is_behind", status::is_behind(&commits));
  Ok(outputs)
}
