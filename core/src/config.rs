use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Scalar parameters of a run.
///
/// Missing fields in a config file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Requested number of locations; rounded down to a perfect square.
    pub n_locations: i64,
    pub type_a_fraction: f64,
    pub type_b_fraction: f64,
    /// Minimum share of same-type occupied neighbors for an agent to stay.
    pub threshold: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            n_locations: 900,
            type_a_fraction: 0.25,
            type_b_fraction: 0.25,
            threshold: 0.7,
        }
    }
}

impl SimConfig {
    /// Load from a JSON file and validate it.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            n_locations: 400,
            type_a_fraction: 0.45,
            type_b_fraction: 0.45,
            threshold: 0.5,
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.n_locations <= 0 {
            return Err(SimError::InvalidLocationCount {
                n_locations: self.n_locations,
            });
        }
        for (name, value) in [
            ("type_a_fraction", self.type_a_fraction),
            ("type_b_fraction", self.type_b_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::FractionOutOfRange { name, value });
            }
        }
        let sum = self.type_a_fraction + self.type_b_fraction;
        if sum > 1.0 {
            return Err(SimError::FractionSumExceedsOne { sum });
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SimError::ThresholdOutOfRange {
                value: self.threshold,
            });
        }
        Ok(())
    }

    /// Side length of the grid: the largest N with N² <= n_locations.
    pub fn grid_size(&self) -> usize {
        let n = self.n_locations.max(0) as u64;
        let mut size = (n as f64).sqrt() as u64;
        // Correct float error on large perfect squares.
        while size * size > n {
            size -= 1;
        }
        while (size + 1) * (size + 1) <= n {
            size += 1;
        }
        size as usize
    }
}

/// How many cells of each kind a grid starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Population {
    pub type_a: usize,
    pub type_b: usize,
    pub vacant: usize,
}

impl Population {
    /// Split `cells` by the configured fractions.
    ///
    /// TypeA rounds down, TypeB rounds up, vacant rounds down; any
    /// leftover against `cells` is absorbed by the vacant count. If that
    /// would go negative the surplus comes off TypeB instead.
    pub fn for_cells(config: &SimConfig, cells: usize) -> Self {
        let n = cells as f64;
        let vacant_fraction = 1.0 - config.type_a_fraction - config.type_b_fraction;

        let type_a = (config.type_a_fraction * n).floor() as i64;
        let mut type_b = (config.type_b_fraction * n).ceil() as i64;
        let mut vacant = (vacant_fraction * n).floor().max(0.0) as i64;

        let diff = type_a + type_b + vacant - cells as i64;
        if diff != 0 {
            log::debug!("population rounding off by {diff}, adjusting vacant count");
        }
        vacant -= diff;
        if vacant < 0 {
            type_b += vacant;
            vacant = 0;
        }

        let population = Self {
            type_a: type_a as usize,
            type_b: type_b as usize,
            vacant: vacant as usize,
        };
        debug_assert_eq!(
            population.type_a + population.type_b + population.vacant,
            cells
        );
        population
    }
}
