use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use itertools::Itertools;
use regex::Regex;
use tracing::{debug, info};
use crate::error::{GameError, Result};
use crate::instance::GameInstance;
use crate::snapshot::{SnapshotBatch, SnapshotRecord};

pub const SINGLE_SAVE_PREFIX: &str = "Game";
pub const BATCH_SAVE_PREFIX: &str = "MultipleGames";
pub const SAVE_EXTENSION: &str = "json";

/// Persistence of game instances.
pub trait FileManager {
  /// Writes one instance to a new artifact in `dir` and returns its path.
  fn save_one(&self, game: &GameInstance, dir: &Path) -> Result<PathBuf>;

  /// Writes all `games` to a single new batch artifact in `dir`.
  fn save_batch(&self, games: &[GameInstance], dir: &Path) -> Result<PathBuf>;

  fn load_one(&self, path: &Path) -> Result<SnapshotRecord>;

  fn load_batch(&self, path: &Path) -> Result<SnapshotBatch>;

  /// Save artifacts in `dir`, singles first, each kind ordered by index.
  ///
  /// A missing directory has no saves; it is not an error.
  fn list_saves(&self, dir: &Path) -> Result<Vec<SaveFile>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SaveKind {
  Single,
  Batch,
}

impl SaveKind {
  pub fn prefix(self) -> &'static str {
    match self {
      Self::Single => SINGLE_SAVE_PREFIX,
      Self::Batch => BATCH_SAVE_PREFIX,
    }
  }

  /// Classifies an artifact by its file name alone.
  pub fn of(path: &Path) -> Self {
    let is_batch = path.file_name()
      .and_then(|name| name.to_str())
      .map_or(false, |name| name.starts_with(BATCH_SAVE_PREFIX));
    if is_batch { Self::Batch } else { Self::Single }
  }

  fn file_name(self, index: u32) -> String {
    format!("{}{}.{}", self.prefix(), index, SAVE_EXTENSION)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFile {
  pub kind: SaveKind,
  pub index: u32,
  pub path: PathBuf,
}

impl SaveFile {
  pub fn file_name(&self) -> String {
    self.kind.file_name(self.index)
  }
}

/// `Game<k>.json` or `MultipleGames<k>.json`.
fn parse_save_name(name: &str) -> Option<(SaveKind, u32)> {
  static SAVE_NAME: OnceLock<Regex> = OnceLock::new();
  let re = SAVE_NAME.get_or_init(|| {
    Regex::new(r"^(Game|MultipleGames)(\d+)\.json$").expect("valid save name pattern")
  });

  let caps = re.captures(name)?;
  let kind = if &caps[1] == BATCH_SAVE_PREFIX { SaveKind::Batch } else { SaveKind::Single };
  let index = caps[2].parse().ok()?;
  Some((kind, index))
}

/// Pretty-printed JSON artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileManager;

impl JsonFileManager {
  pub fn new() -> Self {
    Self
  }

  /// Creates the next free artifact of `kind`; never overwrites an existing file.
  fn write_new(&self, dir: &Path, kind: SaveKind, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| GameError::io(dir, e))?;

    let mut index = self.list_saves(dir)?
      .into_iter()
      .filter(|save| save.kind == kind)
      .map(|save| save.index)
      .max()
      .map_or(1, |max| max.saturating_add(1));

    loop {
      let path = dir.join(kind.file_name(index));
      match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(mut file) => {
          file.write_all(contents.as_bytes()).map_err(|e| GameError::io(&path, e))?;
          return Ok(path);
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists && index < u32::MAX => {
          debug!(path = %path.display(), "save name taken, trying next");
          index += 1;
        }
        Err(e) => return Err(GameError::io(&path, e)),
      }
    }
  }

  fn read(&self, path: &Path) -> Result<String> {
    check_path(path, "File path cannot be empty.")?;
    let src = fs::read_to_string(path).map_err(|e| GameError::io(path, e))?;
    if src.trim().is_empty() {
      return Err(GameError::corrupt(format!("{} is empty", path.display())));
    }
    Ok(src)
  }
}

fn check_path(path: &Path, msg: &str) -> Result<()> {
  if path.as_os_str().to_string_lossy().trim().is_empty() {
    return Err(GameError::validation(msg));
  }
  Ok(())
}

fn in_file(path: &Path) -> impl FnOnce(GameError) -> GameError + '_ {
  move |e| match e {
    GameError::CorruptData(msg) => GameError::corrupt(format!("{}: {}", path.display(), msg)),
    e => e,
  }
}

impl FileManager for JsonFileManager {
  fn save_one(&self, game: &GameInstance, dir: &Path) -> Result<PathBuf> {
    check_path(dir, "Directory path cannot be empty.")?;

    let json = SnapshotRecord::from_instance(game).to_json()?;
    let path = self.write_new(dir, SaveKind::Single, &json)?;
    info!(game = game.id(), iteration = game.iteration(), path = %path.display(), "saved game");
    Ok(path)
  }

  fn save_batch(&self, games: &[GameInstance], dir: &Path) -> Result<PathBuf> {
    check_path(dir, "Directory path cannot be empty.")?;
    if games.is_empty() {
      return Err(GameError::validation("cannot save an empty set of games"));
    }

    let json = SnapshotBatch::from_instances(games).to_json()?;
    let path = self.write_new(dir, SaveKind::Batch, &json)?;
    info!(games = games.len(), path = %path.display(), "saved all games");
    Ok(path)
  }

  fn load_one(&self, path: &Path) -> Result<SnapshotRecord> {
    let src = self.read(path)?;
    let record = SnapshotRecord::from_json(&src).map_err(in_file(path))?;
    info!(path = %path.display(), iteration = record.iteration, "loaded game");
    Ok(record)
  }

  fn load_batch(&self, path: &Path) -> Result<SnapshotBatch> {
    let src = self.read(path)?;
    let batch = SnapshotBatch::from_json(&src).map_err(in_file(path))?;
    info!(path = %path.display(), games = batch.game_states.len(), "loaded games");
    Ok(batch)
  }

  fn list_saves(&self, dir: &Path) -> Result<Vec<SaveFile>> {
    check_path(dir, "Directory path cannot be empty.")?;
    if !dir.is_dir() {
      return Ok(vec![]);
    }

    let mut saves = vec![];
    for entry in fs::read_dir(dir).map_err(|e| GameError::io(dir, e))? {
      let entry = entry.map_err(|e| GameError::io(dir, e))?;
      if !entry.path().is_file() {
        continue;
      }

      let name = entry.file_name();
      if let Some((kind, index)) = name.to_str().and_then(parse_save_name) {
        saves.push(SaveFile { kind, index, path: entry.path() });
      }
    }

    Ok(saves.into_iter().sorted_by_key(|save| (save.kind, save.index)).collect())
  }
}
