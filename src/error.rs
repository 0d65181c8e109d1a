use thiserror::Error;

use crate::units::Float;

/// Errors raised at the call boundary, before any integration starts.
///
/// Numeric degeneracies inside a run (a particle reaching the origin) are
/// not errors; they surface as non-finite samples in the returned
/// trajectory and are left to the caller to filter.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown unit system `{0}`, expected `galactic` or `solarsystem`")]
    InvalidUnitSystem(String),

    #[error("time step must be finite and positive, got {0}")]
    InvalidTimeStep(Float),
}
