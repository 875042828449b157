use std::fmt;
use itertools::Itertools;
use rand::Rng;
use crate::error::{GameError, Result};
use crate::rule::{Rule, GAME_OF_LIFE};

/// A fixed-size grid of cells, stored row-major.
///
/// Cells outside the grid are treated as permanently dead; there is no
/// wraparound at the edges.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Field {
  rows: usize,
  cols: usize,
  cells: Vec<bool>,
}

impl Field {
  /// An all-dead field.
  pub fn new(rows: usize, cols: usize) -> Self {
    Self {
      rows,
      cols,
      cells: vec![false; rows * cols],
    }
  }

  /// Every cell is alive with probability 1/2.
  pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
    let cells = (0..rows * cols).map(|_| rng.gen_bool(0.5)).collect();
    Self { rows, cols, cells }
  }

  pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self> {
    let cols = match rows.first() {
      Some(row) if !row.is_empty() => row.len(),
      Some(_) => return Err(GameError::validation("field rows must not be empty")),
      None => return Err(GameError::validation("field must have at least one row")),
    };

    if let Some((i, row)) = rows.iter().find_position(|row| row.len() != cols) {
      return Err(GameError::validation(format!(
        "row {} has {} cells, expected {}", i, row.len(), cols)));
    }

    let num_rows = rows.len();
    let cells = rows.into_iter().flatten().collect();
    Ok(Self { rows: num_rows, cols, cells })
  }

  /// Read a picture where `#` is alive and `.` is dead, one line per row.
  ///
  /// Blank lines around the picture and indentation are ignored.
  pub fn parse(src: impl AsRef<str>) -> Result<Self> {
    let rows = src.as_ref()
      .trim()
      .lines()
      .map(|line| {
        line.trim().chars().map(|c| match c {
          '#' => Ok(true),
          '.' => Ok(false),
          _ => Err(GameError::validation(format!("invalid character {:?}", c))),
        })
        .collect::<Result<Vec<_>>>()
      })
      .collect::<Result<Vec<_>>>()?;

    Self::from_rows(rows)
  }

  /// Caller guarantees `cells.len() == rows * cols`.
  pub(crate) fn from_raw(rows: usize, cols: usize, cells: Vec<bool>) -> Self {
    debug_assert_eq!(cells.len(), rows * cols);
    Self { rows, cols, cells }
  }

  pub fn rows(&self) -> usize {
    self.rows
  }

  pub fn cols(&self) -> usize {
    self.cols
  }

  pub fn get(&self, row: usize, col: usize) -> bool {
    assert!(row < self.rows && col < self.cols,
      "cell ({}, {}) outside {}x{} field", row, col, self.rows, self.cols);
    self.cells[row * self.cols + col]
  }

  pub fn set(&mut self, row: usize, col: usize, alive: bool) {
    assert!(row < self.rows && col < self.cols,
      "cell ({}, {}) outside {}x{} field", row, col, self.rows, self.cols);
    self.cells[row * self.cols + col] = alive;
  }

  pub fn iter_rows(&self) -> impl Iterator<Item = &[bool]> {
    self.cells.chunks(self.cols.max(1))
  }

  pub fn living_cells(&self) -> usize {
    self.cells.iter().filter(|&&alive| alive).count()
  }

  pub fn next_generation(&self) -> Field {
    self.step(GAME_OF_LIFE)
  }

  pub fn step(&self, rule: Rule) -> Field {
    let mut cells = Vec::with_capacity(self.cells.len());
    for row in 0..self.rows {
      for col in 0..self.cols {
        cells.push(rule.next(self.get(row, col), self.live_neighbors(row, col)));
      }
    }
    Self::from_raw(self.rows, self.cols, cells)
  }

  fn live_neighbors(&self, row: usize, col: usize) -> u8 {
    let rows = row.saturating_sub(1) ..= (row + 1).min(self.rows - 1);
    let cols = col.saturating_sub(1) ..= (col + 1).min(self.cols - 1);
    rows.cartesian_product(cols)
      .filter(|&(r, c)| (r, c) != (row, col) && self.get(r, c))
      .count() as u8
  }

  pub fn debug(&self) -> String {
    self.iter_rows()
      .map(|row| row.iter().map(|&alive| if alive { '#' } else { '.' }).collect::<String>())
      .join("\n")
  }
}

impl fmt::Debug for Field {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    writeln!(f, "Field {}x{}", self.rows, self.cols)?;
    f.write_str(&self.debug())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  #[test]
  fn blinker() {
    let field = Field::parse(r"
.#.
.#.
.#.
").unwrap();
    let next = field.next_generation();
    assert_eq!(next.debug(), r"
...
###
...".trim_start_matches('\n'));
    assert_eq!(next.next_generation(), field);
  }

  #[test]
  fn single_cell_dies() {
    let field = Field::parse("#").unwrap();
    assert_eq!(field.next_generation().debug(), ".");
  }

  #[test]
  fn block_is_stable() {
    let field = Field::parse("##\n##").unwrap();
    assert_eq!(field.next_generation(), field);
  }

  #[test]
  fn no_wraparound() {
    // a stable block on a torus
    let field = Field::parse(r"
#...#
.....
.....
.....
#...#
").unwrap();
    assert_eq!(field.next_generation().living_cells(), 0);
  }

  #[test]
  fn overcrowding() {
    let field = Field::parse(r"
###
###
###
").unwrap();
    assert_eq!(field.next_generation().debug(), r"
#.#
...
#.#".trim_start_matches('\n'));
  }

  #[test]
  fn rectangular() {
    let field = Field::parse(r"
......
.###..
").unwrap();
    assert_eq!((field.rows(), field.cols()), (2, 6));
    assert_eq!(field.next_generation().debug(), r"
..#...
..#...".trim_start_matches('\n'));
  }

  #[test]
  fn empty_field() {
    let field = Field::new(0, 0);
    assert_eq!(field.next_generation(), field);
    assert_eq!(field.living_cells(), 0);
  }

  #[test]
  fn from_rows_rejects_ragged() {
    let err = Field::from_rows(vec![vec![true, false], vec![true]]).unwrap_err();
    assert!(err.is_validation());
    assert!(Field::from_rows(vec![]).unwrap_err().is_validation());
    assert!(Field::from_rows(vec![vec![]]).unwrap_err().is_validation());
  }

  #[test]
  fn parse_rejects_unknown_characters() {
    assert!(Field::parse("#x#").is_err());
  }

  #[test]
  fn random_is_reproducible() {
    let a = Field::random(8, 8, &mut StdRng::seed_from_u64(7));
    let b = Field::random(8, 8, &mut StdRng::seed_from_u64(7));
    assert_eq!(a, b);
    assert_eq!(a.living_cells(), a.debug().matches('#').count());
  }
}
