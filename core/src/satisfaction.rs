//! Satisfaction of a single agent with its Moore neighborhood.

use crate::world::{Cell, Grid, Position};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Satisfaction {
    Satisfied,
    Unsatisfied,
    /// Vacant cells have no occupant to satisfy.
    NotApplicable,
}

impl Satisfaction {
    pub fn is_satisfied(self) -> bool {
        self == Satisfaction::Satisfied
    }
}

/// Occupied neighbors of a cell, and how many of them share its type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeighborCounts {
    pub same:  usize,
    pub total: usize,
}

impl NeighborCounts {
    /// Share of occupied neighbors with the same type, if there are any.
    pub fn same_share(&self) -> Option<f64> {
        (self.total > 0).then(|| self.same as f64 / self.total as f64)
    }
}

pub fn neighbor_counts(grid: &Grid, pos: Position) -> NeighborCounts {
    let own = grid.get(pos);
    grid.neighbors(pos)
        .map(|n| grid.get(n))
        .filter(|cell| !cell.is_vacant())
        .fold(NeighborCounts::default(), |mut counts, cell| {
            counts.total += 1;
            if cell == own {
                counts.same += 1;
            }
            counts
        })
}

/// Whether the agent at `pos` is content to stay.
///
/// An agent with no occupied neighbors is always unsatisfied. Otherwise it
/// is satisfied when the same-type share reaches `threshold` (inclusive).
pub fn evaluate(grid: &Grid, pos: Position, threshold: f64) -> Satisfaction {
    if grid.get(pos) == Cell::Vacant {
        return Satisfaction::NotApplicable;
    }
    match neighbor_counts(grid, pos).same_share() {
        Some(share) if share >= threshold => Satisfaction::Satisfied,
        _ => Satisfaction::Unsatisfied,
    }
}
