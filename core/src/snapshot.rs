//! Snapshot serialization — the read-only grid view handed to renderers.

use crate::{
    error::SimResult,
    types::{RunId, Tick},
    world::{Census, Cell, Grid},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridSnapshot {
    pub run_id: RunId,
    pub tick:   Tick,
    pub size:   usize,
    /// Row-major, `size * size` entries.
    pub cells:  Vec<Cell>,
    pub census: Census,
}

impl GridSnapshot {
    pub fn capture(run_id: &str, tick: Tick, grid: &Grid) -> Self {
        Self {
            run_id: run_id.to_string(),
            tick,
            size:   grid.size(),
            cells:  grid.cells().to_vec(),
            census: grid.census(),
        }
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_matches_grid() {
        let grid = Grid::from_pattern(&["RB", "_R"]).unwrap();
        let snap = GridSnapshot::capture("snap-test", 3, &grid);
        assert_eq!(snap.size, 2);
        assert_eq!(snap.cells, vec![Cell::TypeA, Cell::TypeB, Cell::Vacant, Cell::TypeA]);
        assert_eq!(snap.census, Census { type_a: 2, type_b: 1, vacant: 1 });
    }

    #[test]
    fn serializes_cells_as_snake_case() {
        let grid = Grid::from_pattern(&["R_", "_B"]).unwrap();
        let json = GridSnapshot::capture("snap-test", 0, &grid).to_json().unwrap();
        assert!(json.contains(r#""cells":["type_a","vacant","vacant","type_b"]"#), "{json}");
    }
}
