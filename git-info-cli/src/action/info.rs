use clap::Args;
use git_info::{report, Config, GithubClient, Outputs, Repository};

use crate::action::CommonArgs;

#[derive(Args)]
pub(crate) struct InfoAction {
  /// Pull request URL
  #[clap(long, env = "GITHUB_PR_URL")]
  pr: Option<String>,
  #[clap(flatten)]
  pub(super) common: CommonArgs,
}

impl InfoAction {
  pub(crate) async fn execute(self, config: &Config) -> anyhow::Result<Outputs> {
    let repo = Repository::open(&self.common.work_dir).await?;
    let client = GithubClient::new(config)?;

    Ok(report::info(config, &client, &repo, self.pr.as_deref()).await?)
  }
}
