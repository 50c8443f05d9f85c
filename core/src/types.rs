//! Shared primitive types used across the entire simulation.

/// A simulation tick. One tick = one full scan plus relocation pass.
pub type Tick = u64;

/// The canonical run identifier.
pub type RunId = String;
