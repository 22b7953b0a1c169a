//! Error types for lattice operations

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LatticeError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Basis must contain at least one non-empty row")]
    EmptyBasis,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Degenerate basis: orthogonal vector {index} is zero")]
    DegenerateBasis { index: usize },

    #[error("Reduction did not finish within {limit} iterations")]
    IterationLimit { limit: usize },

    #[error("Floating-point value {0} has no exact rational representation")]
    NonFiniteFloat(f64),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, LatticeError>;
