#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

use git_info::config::DEFAULT_FALLBACK_REF;
use git_info::Config;
use serde_json::{json, Value};
use tempfile::TempDir;
use url::Url;
use wiremock::MockServer;

pub fn git(dir: &Path, args: &[&str]) -> String {
  let output = Command::new("git")
    .args(["-c", "commit.gpgsign=false", "-c", "tag.gpgsign=false"])
    .args(args)
    .current_dir(dir)
    .output()
    .expect("git runs");

  assert!(
    output.status.success(),
    "git {} failed: {}",
    args.join(" "),
    String::from_utf8_lossy(&output.stderr)
  );

  String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Scratch repository on `master` with a single initial commit.
pub fn init_repo() -> TempDir {
  let temp = TempDir::new().unwrap();
  let dir = temp.path();

  git(dir, &["init", "--quiet"]);
  git(dir, &["symbolic-ref", "HEAD", "refs/heads/master"]);
  git(dir, &["config", "user.email", "ci@example.com"]);
  git(dir, &["config", "user.name", "CI"]);

  commit(dir, "README.md", "# Test\n", "Initial commit");
  temp
}

/// Writes `file` and commits it, returning the new commit id.
pub fn commit(dir: &Path, file: &str, contents: &str, message: &str) -> String {
  fs::write(dir.join(file), contents).unwrap();
  git(dir, &["add", file]);
  git(dir, &["commit", "--quiet", "-m", message]);
  git(dir, &["rev-parse", "HEAD"])
}

/// Points `refs/remotes/origin/<branch>` at `rev`, as a fetch would.
pub fn set_remote_branch(dir: &Path, branch: &str, rev: &str) {
  git(dir, &["update-ref", &format!("refs/remotes/origin/{}", branch), rev]);
}

pub fn config(server: &MockServer) -> Config {
  Config {
    token: Some("test-token".to_string()),
    repository: Some("acme/shop".to_string()),
    stage: Some("production".to_string()),
    github_ref: Some("refs/heads/master".to_string()),
    api_url: Url::parse(&server.uri()).unwrap(),
    graphql_url: Url::parse(&format!("{}/graphql", server.uri())).unwrap(),
    fallback_ref: DEFAULT_FALLBACK_REF.to_string(),
    output_file: None,
  }
}

pub fn repository_body() -> Value {
  json!({
    "full_name": "acme/shop",
    "clone_url": "https://github.com/acme/shop.git",
  })
}

pub fn pull_body(base: &str, head: &str) -> Value {
  json!({
    "number": 42,
    "merged": false,
    "mergeable": true,
    "base": {
      "ref": base,
      "sha": "1111111111111111111111111111111111111111",
      "repo": repository_body(),
    },
    "head": {
      "ref": head,
      "sha": "2222222222222222222222222222222222222222",
      "repo": {
        "full_name": "contributor/shop",
        "clone_url": "https://github.com/contributor/shop.git",
      },
    },
  })
}

pub fn deployments_body(deployments: &[(&str, &str)]) -> Value {
  let edges: Vec<_> = deployments
    .iter()
    .enumerate()
    .map(|(index, (state, sha))| {
      json!({
        "cursor": format!("cursor-{}", index),
        "node": { "state": state, "commit": { "oid": sha } },
      })
    })
    .collect();

  json!({ "data": { "repository": { "deployments": { "edges": edges } } } })
}
