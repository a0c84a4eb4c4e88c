use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

/// A local git working copy, driven through the `git` executable.
#[derive(Debug, Clone)]
pub struct Repository {
  path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
  pub name: String,
  /// Commit the tag points at, peeled through annotated tag objects.
  pub sha: String,
}

impl Repository {
  pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
    let path = path.into();

    match run_git(&path, &["rev-parse", "--is-inside-work-tree"]).await {
      Ok(inside) if inside == "true" => Ok(Self { path }),
      Ok(_) => Err(Error::NotARepository {
        path,
        stderr: String::new(),
      }),
      Err(Error::GitCommand { stderr, .. }) => Err(Error::NotARepository { path, stderr }),
      Err(err) => Err(err),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub async fn head_commit(&self) -> Result<String> {
    self.git(&["rev-parse", "HEAD"]).await
  }

  /// Lists tags in refname order. Tags that do not lead to a commit are skipped.
  pub async fn tags(&self) -> Result<Vec<Tag>> {
    let raw = self
      .git(&["for-each-ref", "--format=%(refname:strip=2)", "refs/tags"])
      .await?;

    let mut tags = Vec::new();
    for name in raw.lines().filter(|name| !name.is_empty()) {
      // tags of tags need every level peeled
      match self.resolve_commit(&format!("refs/tags/{}", name)).await? {
        Some(sha) => tags.push(Tag {
          name: name.to_string(),
          sha,
        }),
        None => debug!(tag = name, "tag does not point at a commit, skipping"),
      }
    }

    Ok(tags)
  }

  /// Whether tracked files differ from HEAD, in the index or the working tree.
  pub async fn is_dirty(&self) -> Result<bool> {
    let status = self
      .git(&["status", "--porcelain", "--untracked-files=no"])
      .await?;

    Ok(!status.is_empty())
  }

  /// Resolves `rev` to a commit id, or `None` when git does not know it.
  pub async fn resolve_commit(&self, rev: &str) -> Result<Option<String>> {
    let spec = format!("{}^{{commit}}", rev);

    match self.git(&["rev-parse", "--verify", "--quiet", &spec]).await {
      Ok(sha) => Ok(Some(sha)),
      Err(Error::GitCommand { .. }) => Ok(None),
      Err(err) => Err(err),
    }
  }

  /// Commits reachable from `rev`, newest first.
  pub async fn commits(&self, rev: &str) -> Result<Vec<String>> {
    let raw = self.git(&["rev-list", rev]).await?;
    Ok(raw.lines().map(str::to_string).collect())
  }

  /// Number of commits reachable from `to` but not from `from`.
  pub async fn count_between(&self, from: &str, to: &str) -> Result<usize> {
    let range = format!("{}..{}", from, to);
    let raw = self.git(&["rev-list", "--count", &range]).await?;

    raw.parse().map_err(|_| Error::GitCommand {
      args: vec!["rev-list".to_string(), "--count".to_string(), range],
      stderr: format!("unexpected output {:?}", raw),
    })
  }

  /// Switches the working copy to `rev`. Leaves HEAD detached for non-branch refs.
  pub async fn checkout(&self, rev: &str) -> Result<()> {
    self.git(&["checkout", "--quiet", rev]).await?;
    debug!(path = %self.path.display(), rev, "checked out");
    Ok(())
  }

  async fn git(&self, args: &[&str]) -> Result<String> {
    run_git(&self.path, args).await
  }
}

/// Runs a git command inside `path` and returns its trimmed stdout.
async fn run_git(path: &Path, args: &[&str]) -> Result<String> {
  trace!(
    cmd = %format!("git -C {} {}", path.display(), args.join(" ")),
    "running git command"
  );

  let output = Command::new("git")
    .arg("-C")
    .arg(path)
    .args(args)
    .output()
    .await
    .map_err(|err| {
      if err.kind() == ErrorKind::NotFound {
        warn!("git not found in PATH");
        Error::GitNotInstalled
      } else {
        Error::Io(err)
      }
    })?;

  if output.status.success() {
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  } else {
    Err(Error::GitCommand {
      args: args.iter().map(|arg| arg.to_string()).collect(),
      stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
  }
}
