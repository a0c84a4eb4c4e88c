use std::path::PathBuf;

use clap::{Args, Parser};
use git_info::config::{DEFAULT_API_URL, DEFAULT_FALLBACK_REF, DEFAULT_GRAPHQL_URL};
use git_info::Config;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use url::Url;

use crate::action::Action;

mod action;

#[derive(Parser)]
#[command(version, about = "Exposes pull request and deployment metadata as workflow step outputs")]
struct Cli {
  #[clap(flatten)]
  general: GeneralArgs,
  #[clap(subcommand)]
  action: Action,
}

#[derive(Args)]
struct GeneralArgs {
  #[clap(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
  token: Option<String>,
  /// Repository slug, `owner/repo`
  #[clap(long, global = true, env = "GITHUB_REPOSITORY")]
  repository: Option<String>,
  /// Deployment environment to inspect
  #[clap(long, global = true, env = "STAGE")]
  stage: Option<String>,
  #[clap(long, global = true, env = "GITHUB_REF")]
  github_ref: Option<String>,
  #[clap(long, global = true, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
  api_url: Url,
  #[clap(long, global = true, env = "GITHUB_GRAPHQL_URL", default_value = DEFAULT_GRAPHQL_URL)]
  graphql_url: Url,
  /// Ref checked out when the environment has no active deployment
  #[clap(long, global = true, default_value = DEFAULT_FALLBACK_REF)]
  fallback_ref: String,
  /// Also append `key=value` lines to this file
  #[clap(long, global = true, env = "GITHUB_OUTPUT")]
  output_file: Option<PathBuf>,
}

impl From<GeneralArgs> for Config {
  fn from(general: GeneralArgs) -> Self {
    Config {
      token: general.token,
      repository: general.repository,
      stage: general.stage,
      github_ref: general.github_ref,
      api_url: general.api_url,
      graphql_url: general.graphql_url,
      fallback_ref: general.fallback_ref,
      output_file: general.output_file,
    }
  }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let subscriber = FmtSubscriber::builder()
    .with_max_level(if cli.action.debug() {
      Level::DEBUG
    } else {
      Level::INFO
    })
    .with_writer(std::io::stderr)
    .compact()
    .finish();

  tracing::subscriber::set_global_default(subscriber)?;

  info!(concat!(
    "Booting ",
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    "..."
  ));

  cli.action.execute(cli.general.into()).await
}
