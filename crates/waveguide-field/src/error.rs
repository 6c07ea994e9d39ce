//! Error types for field evaluation

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Missing or out-of-domain input (geometry, frequency, grid size, mode tag).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A propagating mode produced a non-finite sample (overflow).
    #[error("compute error: {0}")]
    Compute(String),
}

pub type FieldResult<T> = Result<T, FieldError>;
