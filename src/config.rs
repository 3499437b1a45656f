use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ui::theme::ColorScheme;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Title shown in the header
  pub title: String,
  pub color_scheme: ColorScheme,
  pub cache: CacheConfig,
  pub network: NetworksConfig,
  pub ui: UiConfig,
  pub log: LogConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      title: "teamdeck".to_string(),
      color_scheme: ColorScheme::default(),
      cache: CacheConfig::default(),
      network: NetworksConfig::default(),
      ui: UiConfig::default(),
      log: LogConfig::default(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// Seconds before cached data is considered stale
  pub stale_secs: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self { stale_secs: 30 }
  }
}

impl CacheConfig {
  pub fn stale_time(&self) -> Duration {
    Duration::from_secs(self.stale_secs)
  }
}

/// Simulated network settings, per resource
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworksConfig {
  pub users: NetworkConfig,
  pub demos: NetworkConfig,
}

impl Default for NetworksConfig {
  fn default() -> Self {
    Self {
      users: NetworkConfig {
        list_latency_ms: 500,
        item_latency_ms: 300,
        fail_every: None,
      },
      demos: NetworkConfig {
        list_latency_ms: 300,
        item_latency_ms: 200,
        fail_every: None,
      },
    }
  }
}

impl NetworksConfig {
  /// Remove all artificial latency
  pub fn without_latency(self) -> Self {
    Self {
      users: NetworkConfig {
        list_latency_ms: 0,
        item_latency_ms: 0,
        ..self.users
      },
      demos: NetworkConfig {
        list_latency_ms: 0,
        item_latency_ms: 0,
        ..self.demos
      },
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
  pub list_latency_ms: u64,
  /// Latency of get/update/delete
  pub item_latency_ms: u64,
  /// Fail every n-th call (fault injection); unset or 0 disables
  pub fail_every: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
  /// Rows per page in paginated tables
  pub page_size: usize,
  /// Event loop tick in milliseconds
  pub tick_ms: u64,
}

impl Default for UiConfig {
  fn default() -> Self {
    Self {
      page_size: 20,
      tick_ms: 250,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
  /// Directory for log files (default: $XDG_DATA_HOME/teamdeck/logs)
  pub directory: Option<PathBuf>,
  /// Filter directive, overridden by RUST_LOG
  pub filter: String,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      directory: None,
      filter: "teamdeck=info".to_string(),
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./teamdeck.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/teamdeck/config.yaml
  ///
  /// Without a file the defaults are used.
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
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("teamdeck.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("teamdeck").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    let config: Config = serde_yaml::from_str(contents)?;
    if config.ui.page_size == 0 {
      return Err(eyre!("ui.page_size must be at least 1"));
    }
    if config.ui.tick_ms == 0 {
      return Err(eyre!("ui.tick_ms must be at least 1"));
    }
    Ok(config)
  }

  /// Directory for log files.
  pub fn log_directory(&self) -> Result<PathBuf> {
    if let Some(dir) = &self.log.directory {
      return Ok(dir.clone());
    }
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("teamdeck").join("logs"))
  }
}
