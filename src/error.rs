use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Debug, Error)]
pub enum GameError {
  /// Rejected before any I/O happens.
  #[error("{0}")]
  Validation(String),

  /// Only raised after a save artifact has been read.
  #[error("invalid game state data: {0}")]
  CorruptData(String),

  #[error("{0}")]
  UserInput(String),

  #[error("setup failed: {0}")]
  Setup(String),

  #[error("failed to encode snapshot: {0}")]
  Encode(#[from] serde_json::Error),

  #[error("i/o error on {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl GameError {
  pub(crate) fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }

  pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
    Self::CorruptData(msg.into())
  }

  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::Io { path: path.into(), source }
  }

  pub fn is_corrupt_data(&self) -> bool {
    matches!(self, Self::CorruptData(_))
  }

  pub fn is_validation(&self) -> bool {
    matches!(self, Self::Validation(_))
  }
}
