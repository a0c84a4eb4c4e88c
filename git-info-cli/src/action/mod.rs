use std::io::stdout;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use git_info::{Config, Outputs};

use crate::action::has_changes::HasChangesAction;
use crate::action::info::InfoAction;
use crate::action::is_behind::IsBehindAction;

mod has_changes;
mod info;
mod is_behind;

#[derive(Subcommand)]
pub(crate) enum Action {
  /// Print pull request and deployment metadata
  Info(InfoAction),
  /// Report whether the working copy has uncommitted changes
  HasChanges(HasChangesAction),
  /// Report whether the pull request's base branch is ahead of its head
  IsBehind(IsBehindAction),
}

/// Options every subcommand accepts.
#[derive(Args)]
pub(crate) struct CommonArgs {
  /// Git working copy to inspect
  #[clap(long, default_value = ".")]
  work_dir: PathBuf,
  /// Also print each output as a highlighted `key::value` line
  #[clap(long)]
  debug: bool,
}

impl Action {
  pub(crate) fn debug(&self) -> bool {
    self.common().debug
  }

  fn common(&self) -> &CommonArgs {
    match self {
      Action::Info(action) => &action.common,
      Action::HasChanges(action) => &action.common,
      Action::IsBehind(action) => &action.common,
    }
  }

  pub(crate) async fn execute(self, config: Config) -> anyhow::Result<()> {
    let debug = self.debug();

    let outputs = match self {
      Action::Info(action) => action.execute(&config).await?,
      Action::HasChanges(action) => action.execute().await?,
      Action::IsBehind(action) => action.execute(&config).await?,
    };

    emit(&outputs, debug, &config).await
  }
}

async fn emit(outputs: &Outputs, debug: bool, config: &Config) -> anyhow::Result<()> {
  outputs.write_commands(&mut stdout().lock(), debug)?;

  if let Some(path) = &config.output_file {
    outputs.append_to_file(path).await?;
  }

  Ok(())
}
