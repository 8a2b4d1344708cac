//! Error taxonomy surfaced to the presentation layer.

use kepler_divisions::DivisionError;
use kepler_orbits::{IntegratorError, StateError};
use thiserror::Error;

/// Broad category of a rejected command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidState,
    NumericDegeneracy,
}

/// Every failure leaves the simulation exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid state: {0}")]
    InvalidState(#[from] StateError),
    #[error("numeric degeneracy: {0}")]
    NumericDegeneracy(String),
}

impl SimulationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimulationError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            SimulationError::InvalidState(_) => ErrorKind::InvalidState,
            SimulationError::NumericDegeneracy(_) => ErrorKind::NumericDegeneracy,
        }
    }
}

impl From<IntegratorError> for SimulationError {
    fn from(err: IntegratorError) -> Self {
        match err {
            IntegratorError::NumericDegeneracy { .. } => {
                SimulationError::NumericDegeneracy(err.to_string())
            }
            IntegratorError::NegativeTimeStep(_)
            | IntegratorError::NonFiniteTimeStep(_)
            | IntegratorError::TooManySubsteps { .. }
            | IntegratorError::InvalidSettings(_) => {
                SimulationError::InvalidArgument(err.to_string())
            }
        }
    }
}

impl From<DivisionError> for SimulationError {
    fn from(err: DivisionError) -> Self {
        SimulationError::InvalidArgument(err.to_string())
    }
}
