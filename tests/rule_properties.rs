use multilife::{Field, GameInstance};
use proptest::prelude::*;

fn field() -> impl Strategy<Value = Field> {
  (1usize..10, 1usize..10).prop_flat_map(|(rows, cols)| {
    prop::collection::vec(prop::collection::vec(any::<bool>(), cols), rows)
      .prop_map(|rows| Field::from_rows(rows).unwrap())
  })
}

fn neighbors(field: &Field, row: usize, col: usize) -> usize {
  let mut n = 0;
  for r in row.saturating_sub(1)..=(row + 1).min(field.rows() - 1) {
    for c in col.saturating_sub(1)..=(col + 1).min(field.cols() - 1) {
      if (r, c) != (row, col) && field.get(r, c) {
        n += 1;
      }
    }
  }
  n
}

proptest! {
  #[test]
  fn next_generation_is_deterministic(field in field()) {
    prop_assert_eq!(field.next_generation(), field.next_generation());
  }

  #[test]
  fn conway_rule_per_cell(field in field()) {
    let next = field.next_generation();
    prop_assert_eq!((next.rows(), next.cols()), (field.rows(), field.cols()));

    for row in 0..field.rows() {
      for col in 0..field.cols() {
        let n = neighbors(&field, row, col);
        // born or kept on 3, kept on 2, dead otherwise
        let alive = n == 3 || (n == 2 && field.get(row, col));
        prop_assert_eq!(next.get(row, col), alive, "cell ({}, {}) with {} neighbors", row, col, n);
      }
    }
  }

  #[test]
  fn advance_keeps_count(field in field(), steps in 0usize..5) {
    let mut game = GameInstance::new(1, field);
    for _ in 0..steps {
      game.advance();
    }
    prop_assert_eq!(game.iteration(), steps as u64);
    prop_assert_eq!(game.living_cells(), game.field().living_cells());
  }

  #[test]
  fn paused_advance_changes_nothing(field in field()) {
    let mut game = GameInstance::new(1, field.clone());
    game.set_paused(true);
    prop_assert!(!game.advance());
    prop_assert_eq!(game.field(), &field);
    prop_assert_eq!(game.iteration(), 0);
  }
}
