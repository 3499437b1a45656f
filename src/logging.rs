//! Log setup. The terminal owns stdout, so logs go to a daily-rolling file.

use color_eyre::{eyre::eyre, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the program so buffered lines are flushed on exit.
pub fn init(config: &Config) -> Result<WorkerGuard> {
  let directory = config.log_directory()?;
  std::fs::create_dir_all(&directory)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", directory.display(), e))?;

  let appender = tracing_appender::rolling::daily(&directory, "teamdeck.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .try_init()
    .map_err(|e| eyre!("Failed to install log subscriber: {}", e))?;

  Ok(guard)
}
