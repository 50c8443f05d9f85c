//! Events describing what happened during a run.
//!
//! Events are returned to the driver of the engine; nothing stores them.

use crate::{
    config::Population,
    types::{RunId, Tick},
};
use serde::{Deserialize, Serialize};

/// Variants are appended — never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    RunInitialized {
        run_id: RunId,
        seed: u64,
        size: usize,
        population: Population,
    },
    TickStarted {
        tick: Tick,
    },
    TickCompleted {
        tick: Tick,
    },

    // ── Scan and relocation ────────────────────────
    ScanCompleted {
        tick: Tick,
        vacant: usize,
        unsatisfied_a: usize,
        unsatisfied_b: usize,
    },
    AgentsRelocated {
        tick: Tick,
        type_a: usize,
        type_b: usize,
    },
}
