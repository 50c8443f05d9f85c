//! Per-tick grid scan: sort every cell into the working sets the
//! relocator consumes.

use crate::{
    rng::SimRandom,
    satisfaction::{evaluate, Satisfaction},
    world::{Cell, Grid, Position},
};

/// Positions collected by one scan. Rebuilt from scratch every tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSets {
    pub vacant:        Vec<Position>,
    pub unsatisfied_a: Vec<Position>,
    pub unsatisfied_b: Vec<Position>,
}

impl WorkingSets {
    pub fn unsatisfied_count(&self) -> usize {
        self.unsatisfied_a.len() + self.unsatisfied_b.len()
    }

    /// Independently permute all three sets.
    pub fn shuffle<R: SimRandom>(&mut self, rng: &mut R) {
        rng.shuffle(&mut self.unsatisfied_a);
        rng.shuffle(&mut self.unsatisfied_b);
        rng.shuffle(&mut self.vacant);
    }
}

/// Visit every cell once in row-major order.
pub fn scan(grid: &Grid, threshold: f64) -> WorkingSets {
    let mut sets = WorkingSets::default();
    for pos in grid.positions() {
        match grid.get(pos) {
            Cell::Vacant => sets.vacant.push(pos),
            cell => {
                if evaluate(grid, pos, threshold) == Satisfaction::Unsatisfied {
                    match cell {
                        Cell::TypeA => sets.unsatisfied_a.push(pos),
                        _ => sets.unsatisfied_b.push(pos),
                    }
                }
            }
        }
    }
    sets
}
