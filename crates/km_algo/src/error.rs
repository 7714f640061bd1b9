//! Engine error taxonomy. Every variant aborts the current solve; no partial
//! results are returned.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KemenyError {
    /// Empty profile, zero alternatives, or entries disagreeing on the alternative set.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// A weight function returned a negative or non-finite value for a valid position.
    #[error("invalid weight function: φ({position}) = {value}")]
    InvalidWeightFunction { position: u32, value: f64 },

    /// Weight or entropy query for a position outside `1..=len`.
    #[error("position {position} out of range 1..={len}")]
    OutOfRange { position: u32, len: u32 },

    /// Non-square or non-finite matrix reaching the assignment solver.
    #[error("malformed cost matrix: {0}")]
    MalformedCostMatrix(String),
}

impl From<km_core::CoreError> for KemenyError {
    fn from(e: km_core::CoreError) -> Self {
        KemenyError::InvalidProfile(e.to_string())
    }
}
