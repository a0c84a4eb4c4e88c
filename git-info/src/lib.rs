//! CI metadata for GitHub workflows: pull request refs, the previous
//! deployment, working tree and branch divergence status.

pub mod client;
pub mod config;
pub mod deployment;
pub mod error;
pub mod git;
pub mod output;
pub mod pull;
pub mod report;
pub mod status;

pub use client::GithubClient;
pub use config::Config;
pub use error::{Error, Lookup, Reason, Result};
pub use git::Repository;
pub use output::Outputs;
