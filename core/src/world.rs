//! The world — a square grid of cells, each holding an agent or nothing.
//!
//! RULE: only the relocator mutates a live grid, and every mutation it
//! makes is a swap of an agent into a vacancy. Agent counts per type
//! never change after `populate`.

use crate::{
    config::{Population, SimConfig},
    error::{SimError, SimResult},
    rng::SimRandom,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    TypeA,
    TypeB,
    Vacant,
}

impl Cell {
    pub fn is_vacant(self) -> bool {
        self == Cell::Vacant
    }

    /// Text form used by patterns and the runner: `R`, `B`, `_`.
    pub fn as_char(self) -> char {
        match self {
            Cell::TypeA  => 'R',
            Cell::TypeB  => 'B',
            Cell::Vacant => '_',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'R' | 'r' | 'A' | 'a' => Some(Cell::TypeA),
            'B' | 'b'             => Some(Cell::TypeB),
            '_' | '.' | ' '       => Some(Cell::Vacant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Per-type cell counts of a grid.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Census {
    pub type_a: usize,
    pub type_b: usize,
    pub vacant: usize,
}

/// An N×N matrix of cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size:  usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// An all-vacant grid of `size`×`size` cells.
    pub fn vacant(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Vacant; size * size],
        }
    }

    /// Build a grid from explicit rows. Rejects ragged or non-square input.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> SimResult<Self> {
        let size = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(SimError::InvalidGrid {
                reason: format!("row {i} has {} cells, expected {size}", row.len()),
            });
        }
        Ok(Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Build a grid from text rows such as `["RR_", "_B_", "R_B"]`.
    pub fn from_pattern(rows: &[&str]) -> SimResult<Self> {
        let parsed = rows
            .iter()
            .map(|line| {
                line.chars()
                    .map(|c| {
                        Cell::from_char(c).ok_or_else(|| SimError::InvalidGrid {
                            reason: format!("unknown cell character '{c}'"),
                        })
                    })
                    .collect::<SimResult<Vec<Cell>>>()
            })
            .collect::<SimResult<Vec<_>>>()?;
        Self::from_rows(parsed)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn contains(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.size && (col as usize) < self.size
    }

    pub fn get(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        let i = self.index(pos);
        self.cells[i] = cell;
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }

    /// The up-to-8 Moore neighbors of `pos` that lie inside the grid.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        const OFFSETS: [(isize, isize); 8] = [
            (-1, -1), (-1, 0), (-1, 1),
            ( 0, -1),          ( 0, 1),
            ( 1, -1), ( 1, 0), ( 1, 1),
        ];
        OFFSETS.iter().filter_map(move |&(dr, dc)| {
            let row = pos.row as isize + dr;
            let col = pos.col as isize + dc;
            self.contains(row, col)
                .then(|| Position::new(row as usize, col as usize))
        })
    }

    pub fn census(&self) -> Census {
        self.cells.iter().fold(Census::default(), |mut c, cell| {
            match cell {
                Cell::TypeA  => c.type_a += 1,
                Cell::TypeB  => c.type_b += 1,
                Cell::Vacant => c.vacant += 1,
            }
            c
        })
    }

    /// One line of text per row, `R`/`B`/`_` per cell.
    pub fn to_text(&self) -> String {
        self.cells
            .chunks(self.size.max(1))
            .map(|row| row.iter().map(|c| c.as_char()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            pos.row < self.size && pos.col < self.size,
            "position ({}, {}) outside {}x{} grid",
            pos.row, pos.col, self.size, self.size
        );
        pos.row * self.size + pos.col
    }
}

/// Lay out a fresh grid for `config`: shuffle every position, then hand
/// out TypeA agents, TypeB agents, and leave the remainder vacant.
pub fn populate<R: SimRandom>(config: &SimConfig, rng: &mut R) -> SimResult<Grid> {
    config.validate()?;
    let size = config.grid_size();
    let population = Population::for_cells(config, size * size);

    let mut grid = Grid::vacant(size);
    let mut open: Vec<Position> = grid.positions().collect();
    rng.shuffle(&mut open);

    let agents = std::iter::repeat(Cell::TypeA)
        .take(population.type_a)
        .chain(std::iter::repeat(Cell::TypeB).take(population.type_b));
    for (pos, cell) in open.into_iter().zip(agents) {
        grid.set(pos, cell);
    }

    log::info!(
        "populated {size}x{size} grid: type_a={} type_b={} vacant={}",
        population.type_a,
        population.type_b,
        population.vacant
    );
    Ok(grid)
}
