use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  Usage(String),

  #[error("missing configuration: {0} is not set")]
  MissingConfig(&'static str),

  #[error("invalid repository slug {0:?}, expected owner/repo")]
  InvalidSlug(String),

  #[error("{} is not a git working copy{}", .path.display(), git_detail(.stderr))]
  NotARepository { path: PathBuf, stderr: String },

  #[error("git not found in PATH")]
  GitNotInstalled,

  #[error("git {} failed: {stderr}", .args.join(" "))]
  GitCommand { args: Vec<String>, stderr: String },

  #[error("GitHub API responded with {status} for {url}")]
  Api { status: StatusCode, url: String },

  #[error("GraphQL query failed: {0}")]
  GraphQl(String),

  #[error(transparent)]
  Http(#[from] reqwest::Error),

  #[error(transparent)]
  Url(#[from] url::ParseError),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

fn git_detail(stderr: &str) -> String {
  if stderr.is_empty() {
    String::new()
  } else {
    format!(": {}", stderr)
  }
}

/// Why a lookup produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
  /// The API reported the repository or pull request as absent.
  NotFound,
  /// The input did not have the expected shape.
  Malformed,
  /// A local ref could not be resolved.
  Unresolvable,
}

/// Outcome of an operation that may recover from an absent value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
  Found(T),
  Missing(Reason),
}

impl<T> Lookup<T> {
  pub fn found(self) -> Option<T> {
    match self {
      Lookup::Found(value) => Some(value),
      Lookup::Missing(_) => None,
    }
  }

  pub fn as_found(&self) -> Option<&T> {
    match self {
      Lookup::Found(value) => Some(value),
      Lookup::Missing(_) => None,
    }
  }
}
