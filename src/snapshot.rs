//! Durable form of game instances.
//!
//! A field is stored as rows of `0`/`1` integers rather than booleans:
//!
//! ```json
//! { "field": [[0, 1, 0], [0, 1, 0]], "iteration": 12 }
//! ```
//!
//! A batch wraps several records as `{ "gameStates": [ ... ] }`. Keys written
//! by older saves in PascalCase are accepted on load.

use serde::{Deserialize, Serialize};
use crate::error::{GameError, Result};
use crate::field::Field;
use crate::instance::GameInstance;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
  #[serde(alias = "Field", default)]
  pub field: Vec<Vec<u8>>,
  #[serde(alias = "Iteration", default)]
  pub iteration: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotBatch {
  #[serde(rename = "gameStates", alias = "GameStates", default)]
  pub game_states: Vec<SnapshotRecord>,
}

impl SnapshotRecord {
  pub fn from_instance(game: &GameInstance) -> Self {
    let field = game.field()
      .iter_rows()
      .map(|row| row.iter().map(|&alive| alive as u8).collect())
      .collect();
    Self { field, iteration: game.iteration() }
  }

  pub fn from_json(src: &str) -> Result<Self> {
    let record: Self = serde_json::from_str(src)
      .map_err(|e| GameError::corrupt(e.to_string()))?;
    record.validate()?;
    Ok(record)
  }

  pub fn to_json(&self) -> Result<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  /// Checks the shape and cell values without building a field.
  pub fn validate(&self) -> Result<()> {
    let cols = match self.field.first() {
      Some(row) if !row.is_empty() => row.len(),
      Some(_) => return Err(GameError::corrupt("field has an empty first row")),
      None => return Err(GameError::corrupt("field has no rows")),
    };

    for (i, row) in self.field.iter().enumerate() {
      if row.len() != cols {
        return Err(GameError::corrupt(format!(
          "row {} has {} cells, expected {}", i, row.len(), cols)));
      }
      if let Some(j) = row.iter().position(|&cell| cell > 1) {
        return Err(GameError::corrupt(format!(
          "cell ({}, {}) is {}, expected 0 or 1", i, j, row[j])));
      }
    }
    Ok(())
  }

  pub fn to_field(&self) -> Result<Field> {
    self.validate()?;
    let rows = self.field.len();
    let cols = self.field[0].len();
    let cells = self.field.iter().flatten().map(|&cell| cell == 1).collect();
    Ok(Field::from_raw(rows, cols, cells))
  }

  pub fn into_instance(self, id: u32) -> Result<GameInstance> {
    let field = self.to_field()?;
    Ok(GameInstance::with_iteration(id, field, self.iteration))
  }
}

impl SnapshotBatch {
  pub fn from_instances(games: &[GameInstance]) -> Self {
    Self {
      game_states: games.iter().map(SnapshotRecord::from_instance).collect(),
    }
  }

  pub fn from_json(src: &str) -> Result<Self> {
    let batch: Self = serde_json::from_str(src)
      .map_err(|e| GameError::corrupt(e.to_string()))?;
    batch.validate()?;
    Ok(batch)
  }

  pub fn to_json(&self) -> Result<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  pub fn validate(&self) -> Result<()> {
    if self.game_states.is_empty() {
      return Err(GameError::corrupt("batch has no game states"));
    }

    for (i, record) in self.game_states.iter().enumerate() {
      record.validate().map_err(|e| match e {
        GameError::CorruptData(msg) => GameError::corrupt(format!("game state {}: {}", i + 1, msg)),
        e => e,
      })?;
    }
    Ok(())
  }

  /// Ids are assigned `1..=N` in batch order; saved ids are not persisted.
  pub fn into_instances(self) -> Result<Vec<GameInstance>> {
    self.validate()?;
    self.game_states
      .into_iter()
      .zip(1..)
      .map(|(record, id)| record.into_instance(id))
      .collect()
  }
}
