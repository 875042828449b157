use crate::field::Field;

/// One independently evolving simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInstance {
  id: u32,
  field: Field,
  iteration: u64,
  paused: bool,
  /// Always equal to `field.living_cells()`.
  living_cells: usize,
}

impl GameInstance {
  pub fn new(id: u32, field: Field) -> Self {
    Self::with_iteration(id, field, 0)
  }

  pub fn with_iteration(id: u32, field: Field, iteration: u64) -> Self {
    let living_cells = field.living_cells();
    Self {
      id,
      field,
      iteration,
      paused: false,
      living_cells,
    }
  }

  /// Moves a running instance one generation forward.
  ///
  /// Returns `false` without touching anything when the instance is paused.
  pub fn advance(&mut self) -> bool {
    if self.paused {
      return false;
    }

    self.field = self.field.next_generation();
    self.iteration += 1;
    self.living_cells = self.field.living_cells();
    true
  }

  pub fn set_paused(&mut self, paused: bool) {
    self.paused = paused;
  }

  pub fn toggle_paused(&mut self) {
    self.paused = !self.paused;
  }

  pub fn id(&self) -> u32 {
    self.id
  }

  pub fn field(&self) -> &Field {
    &self.field
  }

  pub fn iteration(&self) -> u64 {
    self.iteration
  }

  pub fn is_paused(&self) -> bool {
    self.paused
  }

  pub fn living_cells(&self) -> usize {
    self.living_cells
  }
}
