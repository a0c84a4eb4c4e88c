use std::io::Write;
use std::path::Path;

use console::style;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Step outputs in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outputs {
  entries: Vec<(String, String)>,
}

impl Outputs {
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets `key`, replacing an earlier value in place.
  pub fn set(&mut self, key: &str, value: impl ToString) {
    let value = value.to_string();

    match self.entries.iter_mut().find(|(existing, _)| existing == key) {
      Some((_, slot)) => *slot = value,
      None => self.entries.push((key.to_string(), value)),
    }
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self
      .entries
      .iter()
      .find(|(existing, _)| existing == key)
      .map(|(_, value)| value.as_str())
  }

  pub fn contains(&self, key: &str) -> bool {
    self.get(key).is_some()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .entries
      .iter()
      .map(|(key, value)| (key.as_str(), value.as_str()))
  }

  /// Writes `::set-output` workflow commands, each preceded by a highlighted
  /// `key::value` line when `debug` is set.
  pub fn write_commands(&self, out: &mut impl Write, debug: bool) -> std::io::Result<()> {
    for (key, value) in self.iter() {
      if debug {
        writeln!(out, "{}", style(format!("{}::{}", key, value)).green())?;
      }
      writeln!(out, "::set-output name={}::{}", key, value)?;
    }

    out.flush()
  }

  /// Appends `key=value` lines to a `GITHUB_OUTPUT` style file.
  pub async fn append_to_file(&self, path: &Path) -> std::io::Result<()> {
    let mut buf = String::new();
    for (key, value) in self.iter() {
      buf.push_str(key);
      buf.push('=');
      buf.push_str(value);
      buf.push('\n');
    }

    let mut file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(path)
      .await?;
    file.write_all(buf.as_bytes()).await?;
    file.flush().await
  }
}
