//! Moves unsatisfied agents into vacant cells.
//!
//! Which type moves next is drawn in proportion to how many unsatisfied
//! agents of each type remain. Positions are always taken from the back of
//! the working sets, so callers shuffle them first.

use crate::{
    planner::WorkingSets,
    rng::SimRandom,
    world::{Cell, Grid},
};
use serde::{Deserialize, Serialize};

/// Number of agents of each type moved by one relocation pass.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relocations {
    pub type_a: usize,
    pub type_b: usize,
}

impl Relocations {
    pub fn total(&self) -> usize {
        self.type_a + self.type_b
    }
}

/// Pick the type of the next agent to move.
///
/// TypeA is preferred with probability `remaining_a / (remaining_a + remaining_b)`;
/// an empty preferred side falls back to the other. `None` when both are empty.
pub fn choose_type<R: SimRandom>(
    rng: &mut R,
    remaining_a: usize,
    remaining_b: usize,
) -> Option<Cell> {
    let remaining = remaining_a + remaining_b;
    if remaining == 0 {
        return None;
    }
    let p_a = remaining_a as f64 / remaining as f64;
    let prefer_a = rng.next_f64() < p_a;

    let chosen = match (prefer_a, remaining_a > 0, remaining_b > 0) {
        (true, true, _) | (false, true, false) => Cell::TypeA,
        _ => Cell::TypeB,
    };
    Some(chosen)
}

/// Consume `sets`, moving agents into vacancies until either runs out.
pub fn relocate<R: SimRandom>(grid: &mut Grid, sets: WorkingSets, rng: &mut R) -> Relocations {
    let WorkingSets {
        mut vacant,
        mut unsatisfied_a,
        mut unsatisfied_b,
    } = sets;
    let mut moved = Relocations::default();

    while !vacant.is_empty() {
        let Some(kind) = choose_type(rng, unsatisfied_a.len(), unsatisfied_b.len()) else {
            break;
        };
        let (from, counter) = match kind {
            Cell::TypeA => (&mut unsatisfied_a, &mut moved.type_a),
            _ => (&mut unsatisfied_b, &mut moved.type_b),
        };

        let (Some(target), Some(source)) = (vacant.pop(), from.pop()) else {
            unreachable!("choose_type only returns a type with agents left");
        };
        debug_assert_eq!(grid.get(target), Cell::Vacant, "{target:?} is not vacant");
        debug_assert_eq!(grid.get(source), kind, "{source:?} does not hold {kind:?}");

        grid.set(target, kind);
        grid.set(source, Cell::Vacant);
        *counter += 1;
    }

    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        planner::scan,
        rng::StreamRng,
        world::Position,
    };
    use std::collections::{HashSet, VecDeque};

    /// Replays fixed draws and leaves every order untouched.
    struct ScriptedRng {
        draws: VecDeque<f64>,
    }

    impl ScriptedRng {
        fn new(draws: &[f64]) -> Self {
            Self { draws: draws.iter().copied().collect() }
        }
    }

    impl SimRandom for ScriptedRng {
        fn next_f64(&mut self) -> f64 {
            self.draws.pop_front().expect("scripted draws exhausted")
        }

        fn shuffle<T>(&mut self, _items: &mut [T]) {}
    }

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn choose_type_follows_draw_against_proportion() {
        // p_a = 3/4
        let mut rng = ScriptedRng::new(&[0.0, 0.74, 0.75, 0.99]);
        assert_eq!(choose_type(&mut rng, 3, 1), Some(Cell::TypeA));
        assert_eq!(choose_type(&mut rng, 3, 1), Some(Cell::TypeA));
        assert_eq!(choose_type(&mut rng, 3, 1), Some(Cell::TypeB));
        assert_eq!(choose_type(&mut rng, 3, 1), Some(Cell::TypeB));
    }

    #[test]
    fn choose_type_falls_back_when_side_is_empty() {
        let mut rng = ScriptedRng::new(&[0.99, 0.0]);
        assert_eq!(choose_type(&mut rng, 2, 0), Some(Cell::TypeA));
        assert_eq!(choose_type(&mut rng, 0, 2), Some(Cell::TypeB));
    }

    #[test]
    fn choose_type_with_nothing_left_draws_nothing() {
        let mut rng = ScriptedRng::new(&[]);
        assert_eq!(choose_type(&mut rng, 0, 0), None);
    }

    #[test]
    fn proportional_draw_converges() {
        const ROUNDS: usize = 40_000;
        let mut rng = StreamRng::new(0x5eed, 0);
        let picked_a = (0..ROUNDS)
            .filter(|_| choose_type(&mut rng, 3, 1) == Some(Cell::TypeA))
            .count();
        let share = picked_a as f64 / ROUNDS as f64;
        assert!(
            (share - 0.75).abs() < 0.01,
            "TypeA chosen first in {share:.4} of rounds, expected ~0.75"
        );
    }

    #[test]
    fn moves_pop_from_the_back_of_each_set() {
        let mut grid = Grid::from_pattern(&["RR_", "_B_", "R_B"]).unwrap();
        let sets = WorkingSets {
            vacant: vec![p(0, 2), p(1, 0), p(1, 2), p(2, 1)],
            unsatisfied_a: vec![p(2, 0)],
            unsatisfied_b: vec![p(1, 1)],
        };
        // 0.9 >= 0.5 moves B into (2,1); then only A remains and takes (1,2).
        let moved = relocate(&mut grid, sets, &mut ScriptedRng::new(&[0.9, 0.0]));

        assert_eq!(moved, Relocations { type_a: 1, type_b: 1 });
        assert_eq!(grid.to_text(), "RR_\n__R\n_BB");
    }

    #[test]
    fn scenario_tick_moves_into_last_vacancies() {
        let mut grid = Grid::from_pattern(&["RR_", "_B_", "R_B"]).unwrap();
        let sets = scan(&grid, 0.5);
        let before = grid.census();
        let moved = relocate(&mut grid, sets, &mut ScriptedRng::new(&[0.1, 0.9]));

        // A from (2,0) -> (2,1); B from (1,1) -> (1,2).
        assert_eq!(moved.total(), 2);
        assert_eq!(grid.to_text(), "RR_\n__B\n_RB");
        assert_eq!(grid.census(), before);
    }

    #[test]
    fn no_vacancies_means_no_moves() {
        let mut grid = Grid::from_pattern(&["RB", "BR"]).unwrap();
        let before = grid.clone();
        let sets = WorkingSets {
            vacant: vec![],
            unsatisfied_a: vec![p(0, 0), p(1, 1)],
            unsatisfied_b: vec![p(0, 1), p(1, 0)],
        };
        let moved = relocate(&mut grid, sets, &mut ScriptedRng::new(&[]));
        assert_eq!(moved.total(), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn no_unsatisfied_agents_means_no_moves() {
        let mut grid = Grid::from_pattern(&["RR", "__"]).unwrap();
        let before = grid.clone();
        let sets = WorkingSets {
            vacant: vec![p(1, 0), p(1, 1)],
            ..WorkingSets::default()
        };
        let moved = relocate(&mut grid, sets, &mut ScriptedRng::new(&[]));
        assert_eq!(moved.total(), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn stops_when_vacancies_run_out() {
        let mut grid = Grid::from_pattern(&["RRR", "BBB", "R__"]).unwrap();
        let sets = WorkingSets {
            vacant: vec![p(2, 1), p(2, 2)],
            unsatisfied_a: vec![p(0, 0), p(0, 1), p(0, 2)],
            unsatisfied_b: vec![p(1, 0), p(1, 1), p(1, 2)],
        };
        let moved = relocate(&mut grid, sets, &mut ScriptedRng::new(&[0.0, 0.0]));
        assert_eq!(moved, Relocations { type_a: 2, type_b: 0 });
        assert_eq!(grid.to_text(), "R__\nBBB\nRRR");
    }

    #[test]
    fn only_collected_positions_change() {
        let config = crate::config::SimConfig::default_test();
        let mut grid = crate::world::populate(&config, &mut StreamRng::new(21, 0)).unwrap();
        let before = grid.clone();

        let mut sets = scan(&grid, config.threshold);
        let mut rng = StreamRng::new(21, 1);
        sets.shuffle(&mut rng);
        let touched: HashSet<Position> = sets
            .vacant
            .iter()
            .chain(&sets.unsatisfied_a)
            .chain(&sets.unsatisfied_b)
            .copied()
            .collect();
        let (vacant, unsatisfied) = (sets.vacant.clone(), sets.unsatisfied_count());

        let moved = relocate(&mut grid, sets, &mut rng);
        assert_eq!(moved.total(), vacant.len().min(unsatisfied));

        for pos in grid.positions() {
            if grid.get(pos) != before.get(pos) {
                assert!(touched.contains(&pos), "{pos:?} changed but was never collected");
                if before.get(pos).is_vacant() {
                    assert!(vacant.contains(&pos));
                } else {
                    assert!(grid.get(pos).is_vacant());
                }
            }
        }
        assert_eq!(grid.census(), before.census());
    }
}
