//! The simulation engine — owns the grid and advances it one tick at a time.
//!
//! TICK ORDER (fixed, never reordered):
//!   1. Scan     — classify every cell against the threshold
//!   2. Shuffle  — permute vacant and unsatisfied sets
//!   3. Relocate — move unsatisfied agents into vacancies
//!
//! RULES:
//!   - The engine is the only owner of the grid; drivers get `&Grid`.
//!   - All randomness flows through the RngBank.
//!   - A tick never fails; broken invariants panic.

use crate::{
    clock::SimClock,
    config::{Population, SimConfig},
    error::SimResult,
    event::SimEvent,
    planner::scan,
    relocator::{relocate, Relocations},
    rng::{RngBank, SimRandom, StreamSlot},
    snapshot::GridSnapshot,
    types::{RunId, Tick},
    world::{populate, Grid},
};
use serde::{Deserialize, Serialize};

/// What one scan-shuffle-relocate pass saw and did.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TickOutcome {
    pub vacant:        usize,
    pub unsatisfied_a: usize,
    pub unsatisfied_b: usize,
    pub relocations:   Relocations,
}

impl TickOutcome {
    pub fn unsatisfied(&self) -> usize {
        self.unsatisfied_a + self.unsatisfied_b
    }
}

/// Advance `grid` by one tick. Usable without an engine.
pub fn step<R: SimRandom>(grid: &mut Grid, threshold: f64, rng: &mut R) -> TickOutcome {
    let mut sets = scan(grid, threshold);
    let (vacant, unsatisfied_a, unsatisfied_b) = (
        sets.vacant.len(),
        sets.unsatisfied_a.len(),
        sets.unsatisfied_b.len(),
    );
    sets.shuffle(rng);
    let relocations = relocate(grid, sets, rng);

    TickOutcome {
        vacant,
        unsatisfied_a,
        unsatisfied_b,
        relocations,
    }
}

pub struct SimEngine {
    pub run_id:   RunId,
    pub clock:    SimClock,
    pub rng_bank: RngBank,
    seed:         u64,
    config:       SimConfig,
    population:   Population,
    grid:         Grid,
    last_outcome: Option<TickOutcome>,
}

impl SimEngine {
    /// Validate `config` and lay out the initial grid from `seed`.
    pub fn new(run_id: RunId, seed: u64, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let rng_bank = RngBank::new(seed);
        let mut layout_rng = rng_bank.for_slot_at_tick(StreamSlot::Layout, 0);
        let grid = populate(&config, &mut layout_rng)?;
        let population = Population::for_cells(&config, grid.cell_count());

        log::info!(
            "run {run_id}: seed={seed} size={} threshold={}",
            grid.size(),
            config.threshold
        );

        Ok(Self {
            clock: SimClock::new(run_id.clone()),
            rng_bank,
            seed,
            config,
            population,
            grid,
            last_outcome: None,
            run_id,
        })
    }

    /// Engine over `SimConfig::default_test()`.
    pub fn build_test(run_id: RunId, seed: u64) -> SimResult<Self> {
        Self::new(run_id, seed, SimConfig::default_test())
    }

    /// Advance one tick. The clock must be running.
    pub fn tick(&mut self) -> Vec<SimEvent> {
        assert!(!self.clock.paused, "tick() called on paused engine");

        let mut events = Vec::with_capacity(5);
        if self.clock.current_tick == 0 {
            events.push(SimEvent::RunInitialized {
                run_id:     self.run_id.clone(),
                seed:       self.seed,
                size:       self.grid.size(),
                population: self.population,
            });
        }

        let current_tick = self.clock.advance();
        events.push(SimEvent::TickStarted { tick: current_tick });

        let mut rng = self
            .rng_bank
            .for_slot_at_tick(StreamSlot::Relocation, current_tick);
        let outcome = step(&mut self.grid, self.config.threshold, &mut rng);

        log::debug!(
            "tick={current_tick} vacant={} unsatisfied_a={} unsatisfied_b={} moved_a={} moved_b={}",
            outcome.vacant,
            outcome.unsatisfied_a,
            outcome.unsatisfied_b,
            outcome.relocations.type_a,
            outcome.relocations.type_b
        );
        debug_assert_eq!(
            self.grid.census().vacant,
            outcome.vacant,
            "relocation changed the vacancy count"
        );

        events.push(SimEvent::ScanCompleted {
            tick:          current_tick,
            vacant:        outcome.vacant,
            unsatisfied_a: outcome.unsatisfied_a,
            unsatisfied_b: outcome.unsatisfied_b,
        });
        events.push(SimEvent::AgentsRelocated {
            tick:   current_tick,
            type_a: outcome.relocations.type_a,
            type_b: outcome.relocations.type_b,
        });
        events.push(SimEvent::TickCompleted { tick: current_tick });

        self.last_outcome = Some(outcome);
        events
    }

    /// Run n ticks in a loop. Used for testing and fast-forward.
    /// Returns the total number of agents moved.
    pub fn run_ticks(&mut self, n: u64) -> Relocations {
        self.clock.resume();
        let mut moved = Relocations::default();
        for _ in 0..n {
            self.tick();
            if let Some(outcome) = self.last_outcome {
                moved.type_a += outcome.relocations.type_a;
                moved.type_b += outcome.relocations.type_b;
            }
        }
        self.clock.pause();
        moved
    }

    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn population(&self) -> Population {
        self.population
    }

    /// Read-only view of the current grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn last_outcome(&self) -> Option<TickOutcome> {
        self.last_outcome
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::capture(&self.run_id, self.clock.current_tick, &self.grid)
    }

    /// True when no agent on the current grid is unsatisfied.
    pub fn is_settled(&self) -> bool {
        scan(&self.grid, self.config.threshold).unsatisfied_count() == 0
    }
}
