use clap::Args;
use git_info::{report, Outputs, Repository};

use crate::action::CommonArgs;

#[derive(Args)]
pub(crate) struct HasChangesAction {
  #[clap(flatten)]
  pub(super) common: CommonArgs,
}

impl HasChangesAction {
  pub(crate) async fn execute(self) -> anyhow::Result<Outputs> {
    let repo = Repository::open(&self.common.work_dir).await?;

    Ok(report::has_changes(&repo).await?)
  }
}
