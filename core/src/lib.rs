//! Schelling-style segregation simulation on a square grid.
//!
//! Each tick scans the grid for unsatisfied agents and vacancies, shuffles
//! both, then moves agents into vacancies in proportion to how many of each
//! type want to leave. See `engine` for the tick order.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod planner;
pub mod relocator;
pub mod rng;
pub mod satisfaction;
pub mod snapshot;
pub mod types;
pub mod world;
