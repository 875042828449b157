use std::fmt::{self, Display};
use itertools::Itertools;

/// Birth/survival rule of a two-state, Moore-neighborhood automaton.
///
/// Bit `n` of a mask is set when `n` live neighbors trigger the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
  birth: NeighborMask,
  survival: NeighborMask,
}

pub(crate) type NeighborMask = u16;

pub const GAME_OF_LIFE: Rule = Rule {
  birth: 0b000001000,
  survival: 0b000001100,
};

impl Rule {
  /// State of a cell in the next generation.
  pub fn next(&self, alive: bool, neighbors: u8) -> bool {
    debug_assert!(neighbors < 9);
    let mask = if alive { self.survival } else { self.birth };
    mask >> neighbors & 1 != 0
  }
}

impl Default for Rule {
  fn default() -> Self {
    GAME_OF_LIFE
  }
}

impl Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let counts = |mask: NeighborMask| (0..9).filter(move |n| mask >> n & 1 != 0).join("");
    write!(f, "B{}/S{}", counts(self.birth), counts(self.survival))
  }
}
