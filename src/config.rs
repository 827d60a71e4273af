use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::monday::types::BoardKind;
use crate::retry::RetryPolicy;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  /// Board used when a command does not name one
  pub default_board: Option<String>,
  /// Visibility of boards created by `ensure_board`
  #[serde(default)]
  pub board_kind: BoardKind,
  #[serde(default)]
  pub retry: RetryPolicy,
  #[serde(default)]
  pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
  /// `tracing` filter directive (e.g. "info,mwrap=debug"); RUST_LOG wins
  pub filter: Option<String>,
  /// Write logs to this file instead of stderr
  pub file: Option<PathBuf>,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./mwrap.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/mwrap/config.yaml
  ///
  /// Falls back to defaults when no file is found.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => {
        debug!("No configuration file found, using defaults");
        Ok(Self::default())
      }
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("mwrap.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("mwrap").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    // An empty file is a valid, all-default config
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    Ok(serde_yaml::from_str(contents)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.retry.max_attempts, 30);
    assert_eq!(config.retry.interval_secs, 2);
    assert_eq!(config.board_kind, BoardKind::Public);
    assert!(config.default_board.is_none());
  }

  #[test]
  fn test_partial_retry_section() {
    let config = Config::parse(
      r#"
default_board: Testing Board For Api
board_kind: private
retry:
  max_attempts: 5
log:
  filter: debug
"#,
    )
    .unwrap();
    assert_eq!(config.default_board.as_deref(), Some("Testing Board For Api"));
    assert_eq!(config.board_kind, BoardKind::Private);
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.interval_secs, 2);
    assert_eq!(config.log.filter.as_deref(), Some("debug"));
  }

  #[test]
  fn test_missing_explicit_path_is_an_error() {
    let result = Config::load(Some(Path::new("/nonexistent/mwrap.yaml")));
    assert!(result.is_err());
  }
}
