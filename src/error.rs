//! Error types surfaced by the calculator.

use thiserror::Error;

use crate::passcalc::{ComputationError, ValidationError};

/// Failure of a pass calculation request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// Rejected before any computation ran.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Computation(#[from] ComputationError),
}

pub type Result<T> = std::result::Result<T, CalcError>;
