use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid location count: {n_locations} (must be > 0)")]
    InvalidLocationCount { n_locations: i64 },

    #[error("Fraction '{name}' out of range: {value} (must be within [0, 1])")]
    FractionOutOfRange { name: &'static str, value: f64 },

    #[error("Agent fractions sum to {sum}, which exceeds 1")]
    FractionSumExceedsOne { sum: f64 },

    #[error("Threshold out of range: {value} (must be within [0, 1])")]
    ThresholdOutOfRange { value: f64 },

    #[error("Invalid grid: {reason}")]
    InvalidGrid { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
