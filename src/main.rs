mod console;

use std::io;
use std::path::PathBuf;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use multilife::{Config, GameError, JsonFileManager, MultiGameManager, StartMode};
use crate::console::{KeyInput, Lines, PromptSelector, TextRenderer};

#[derive(Parser)]
#[command(name = "multilife", about = "Several Game of Life boards in one terminal")]
struct Cli {
  /// TOML settings file
  #[arg(long, global = true)]
  config: Option<PathBuf>,
  #[arg(long, global = true)]
  save_dir: Option<PathBuf>,
  /// Pause between frames in milliseconds
  #[arg(long, global = true)]
  delay_ms: Option<u64>,
  /// Seed for reproducible random fields
  #[arg(long, global = true)]
  seed: Option<u64>,
  #[command(subcommand)]
  mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
  /// Start random games
  New {
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Side of each square field; defaults to the first configured size
    #[arg(long)]
    size: Option<usize>,
  },
  /// Continue from a save, chosen from a list unless given
  Load {
    #[arg(long)]
    file: Option<PathBuf>,
  },
  /// Many small games, viewed one at a time
  Showcase,
}

fn config(cli: &Cli) -> Result<Config, GameError> {
  let mut config = match &cli.config {
    Some(path) => Config::load(path)?,
    None => Config::default(),
  };
  if let Some(dir) = &cli.save_dir {
    config.save_dir = dir.clone();
  }
  if let Some(delay) = cli.delay_ms {
    config.frame_delay_ms = delay;
  }
  if cli.seed.is_some() {
    config.seed = cli.seed;
  }
  config.validate()?;
  Ok(config)
}

fn main() -> Result<(), GameError> {
  let cli = Cli::parse();
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("multilife=info")))
    .init();

  let config = config(&cli)?;
  let mode = start_mode(cli.mode, &config);

  let lines = Lines::spawn();
  let mut manager = MultiGameManager::new(
    config,
    TextRenderer::new(lines.clone()),
    KeyInput::new(lines.clone()),
    PromptSelector::new(lines),
    JsonFileManager::new(),
  );
  finish(manager.start(mode))
}

fn start_mode(mode: Mode, config: &Config) -> StartMode {
  match mode {
    Mode::New { games, size } => StartMode::New {
      games,
      field_size: size.or_else(|| config.field_sizes.first().copied()).unwrap_or(10),
    },
    Mode::Load { file } => StartMode::Load { path: file },
    Mode::Showcase => StartMode::ShowcaseAll,
  }
}

/// A failed start has already been shown through the renderer.
fn finish(result: Result<(), GameError>) -> Result<(), GameError> {
  if let Err(e) = result {
    info!(error = %e, "no session to run");
  }
  Ok(())
}
