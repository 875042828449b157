use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::Deserialize;
use crate::error::{GameError, Result};

/// Session settings. Every key is optional in a config file.
///
/// ```toml
/// save_dir = "Saves"
/// frame_delay_ms = 250
/// seed = 42
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  pub save_dir: PathBuf,
  pub frame_delay_ms: u64,
  pub min_games: usize,
  pub max_games: usize,
  /// Preset field sides; the first one is the default for new games.
  pub field_sizes: Vec<usize>,
  pub showcase_games: usize,
  pub showcase_field_size: usize,
  /// Instance `id` is seeded with `seed + id` when set.
  pub seed: Option<u64>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      save_dir: PathBuf::from("Saves"),
      frame_delay_ms: 1000,
      min_games: 1,
      max_games: 8,
      field_sizes: vec![10, 20, 30],
      showcase_games: 1000,
      showcase_field_size: 20,
      seed: None,
    }
  }
}

impl Config {
  pub fn from_toml_str(src: &str) -> Result<Self> {
    let config: Self = toml::from_str(src).map_err(|e| GameError::validation(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  pub fn load(path: &Path) -> Result<Self> {
    let src = fs::read_to_string(path).map_err(|e| GameError::io(path, e))?;
    Self::from_toml_str(&src)
  }

  pub fn frame_delay(&self) -> Duration {
    Duration::from_millis(self.frame_delay_ms)
  }

  pub fn validate(&self) -> Result<()> {
    if self.min_games == 0 || self.min_games > self.max_games {
      return Err(GameError::validation(format!(
        "game count range {}..={} is empty or starts at zero", self.min_games, self.max_games)));
    }
    if self.showcase_games == 0 || self.showcase_field_size == 0 {
      return Err(GameError::validation("showcase needs at least one game of size 1"));
    }
    if self.field_sizes.contains(&0) {
      return Err(GameError::validation("field sizes must be positive"));
    }
    Ok(())
  }
}
