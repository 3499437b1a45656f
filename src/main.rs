mod app;
mod cache;
mod commands;
mod config;
mod event;
mod logging;
mod provider;
mod query;
mod records;
mod service;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "teamdeck")]
#[command(about = "Team members and demo schedule in the terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./teamdeck.yaml, then $XDG_CONFIG_HOME/teamdeck/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Seconds before cached data is considered stale
  #[arg(long)]
  stale_secs: Option<u64>,

  /// Disable simulated network latency
  #[arg(long)]
  no_latency: bool,

  /// Section to open first
  #[arg(short, long, value_enum, default_value_t = app::Section::Users)]
  start: app::Section,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let mut config = config::Config::load(args.config.as_deref())?;
  if let Some(stale_secs) = args.stale_secs {
    config.cache.stale_secs = stale_secs;
  }
  if args.no_latency {
    config.network = config.network.without_latency();
  }

  // Held until exit so buffered log lines are flushed
  let _log_guard = logging::init(&config)?;
  info!(start = ?args.start, stale_secs = config.cache.stale_secs, "starting teamdeck");

  let providers = provider::Providers::from_config(&config)?;
  let mut app = app::App::new(config, providers, args.start);
  app.run().await?;

  Ok(())
}
