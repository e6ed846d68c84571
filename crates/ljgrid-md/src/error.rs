//! Error types for ljgrid-md.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LjError {
    #[error("coordinate slices have mismatched lengths: x={x}, y={y}, z={z}")]
    MismatchedLengths { x: usize, y: usize, z: usize },

    #[error("particles {i} and {j} are coincident (r² = {r2:e} is below {min:e})")]
    CoincidentParticles { i: usize, j: usize, r2: f64, min: f64 },
}

pub type Result<T> = std::result::Result<T, LjError>;
