//! Server configuration: a TOML file layered under `LINEUP_` environment
//! variables.
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `LINEUP_SUSPENSIONS__MATCH_PENALTY_GAMES=3`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, ConfigBuilder, Environment, builder::DefaultState};
use lineup_core::suspension::SuspensionPolicy;
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:        String,
  pub port:        u16,
  /// SQLite database file. A leading `~/` expands to `$HOME`.
  pub store_path:  PathBuf,
  pub suspensions: SuspensionPolicy,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:        "127.0.0.1".to_string(),
      port:        8080,
      store_path:  PathBuf::from("~/.local/share/lineup/lineup.db"),
      suspensions: SuspensionPolicy::default(),
    }
  }
}

impl ServerConfig {
  /// Read `path` (which may be absent) and apply environment overrides.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let file = config::File::from(path).required(false);
    read(Config::builder().add_source(file))
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

fn read(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<ServerConfig> {
  builder
    .add_source(
      Environment::with_prefix("LINEUP")
        .prefix_separator("_")
        .separator("__"),
    )
    .build()
    .context("failed to read config file")?
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::{File, FileFormat};

  use super::*;

  #[test]
  fn file_values_override_defaults() {
    let toml = r#"
      port = 9100
      store_path = "/var/lib/lineup.db"

      [suspensions]
      match_penalty_games = 3
    "#;
    let cfg = read(Config::builder().add_source(File::from_str(toml, FileFormat::Toml))).unwrap();
    assert_eq!(cfg.port, 9100);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/lineup.db"));
    assert_eq!(cfg.suspensions.match_penalty_games, 3);
    assert_eq!(cfg.suspensions.game_misconduct_games, 1);
  }

  #[test]
  fn missing_file_yields_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/lineup.toml")).unwrap();
    assert_eq!(cfg.suspensions, SuspensionPolicy::default());
  }

  #[test]
  fn tilde_expands_only_as_prefix() {
    let plain = Path::new("/data/~/lineup.db");
    assert_eq!(expand_tilde(plain), plain);
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/lineup.db")), PathBuf::from(home).join("lineup.db"));
    }
  }
}
