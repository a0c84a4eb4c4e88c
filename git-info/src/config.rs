use std::path::PathBuf;

use url::Url;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";
pub const DEFAULT_FALLBACK_REF: &str = "origin/master";

/// Everything the resolvers need from the CI environment, read once at start.
#[derive(Debug, Clone)]
pub struct Config {
  pub token: Option<String>,
  /// `owner/repo` slug of the repository being deployed.
  pub repository: Option<String>,
  /// Deployment environment name.
  pub stage: Option<String>,
  pub github_ref: Option<String>,
  pub api_url: Url,
  pub graphql_url: Url,
  /// Ref checked out when no active deployment exists.
  pub fallback_ref: String,
  pub output_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
  pub owner: String,
  pub name: String,
  pub environment: String,
}

impl Config {
  pub fn deployment_target(&self) -> Result<DeploymentTarget> {
    let slug = non_empty(&self.repository).ok_or(Error::MissingConfig("GITHUB_REPOSITORY"))?;
    let environment = non_empty(&self.stage).ok_or(Error::MissingConfig("STAGE"))?;

    let (owner, name) = match slug.split_once('/') {
      Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
        (owner, name)
      }
      _ => return Err(Error::InvalidSlug(slug.to_string())),
    };

    Ok(DeploymentTarget {
      owner: owner.to_string(),
      name: name.to_string(),
      environment: environment.to_string(),
    })
  }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|value| !value.is_empty())
}
