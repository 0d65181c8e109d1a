//! Client-side orbit engine for the galactic dynamics studio.
//!
//! Computes two-body (Keplerian) trajectories locally with a symplectic
//! leapfrog scheme so the interface can draw an orbit immediately, before
//! the high-precision backend confirms it. An optional ensemble mode
//! propagates a Gaussian cloud of perturbed initial conditions alongside
//! the primary orbit to make sensitivity to initial conditions visible.
//!
//! The engine is a pure function of its inputs. It owns no UI state, does
//! no I/O, and every call returns an independent result, so callers may
//! run integrations concurrently.
//!
//! ```
//! use orbit_engine::{integrate, IntegrationRequest, UnitSystem};
//!
//! let request = IntegrationRequest {
//!     mass: 1.0,
//!     position: [1.0, 0.0, 0.0],
//!     velocity: [0.0, 6.2832, 0.0],
//!     time_step: 0.01,
//!     steps: 200,
//!     units: UnitSystem::SolarSystem,
//!     ..IntegrationRequest::default()
//! };
//! let result = integrate(&request).unwrap();
//! assert_eq!(result.trajectory.len(), 201);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod ensemble;
pub mod error;
pub mod propagator;
pub mod state;
pub mod units;

pub use ensemble::PERTURBATION_SIGMA;
pub use error::EngineError;
pub use propagator::{contains_non_finite, Leapfrog, Trajectory};
pub use state::{PhasePoint, PhysicalState};
pub use units::{Float, UnitConfiguration, UnitSystem, Vector};

/// One integration run, as configured by the caller.
///
/// `mass` is nominal; the unit system's mass scale converts it to physical
/// mass. The defaults mirror the request defaults used across the
/// application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntegrationRequest {
    pub mass: Float,
    pub position: Vector,
    pub velocity: Vector,
    pub time_step: Float,
    pub steps: usize,
    pub units: UnitSystem,
    pub compute_ensemble: bool,
    pub ensemble_size: usize,
}

impl Default for IntegrationRequest {
    fn default() -> Self {
        IntegrationRequest {
            mass: 1.0,
            position: [8.0, 0.0, 0.0],
            velocity: [0.0, 220.0, 0.0],
            time_step: 1.0,
            steps: 1000,
            units: UnitSystem::Galactic,
            compute_ensemble: false,
            ensemble_size: 100,
        }
    }
}

/// The output of one run. The trajectory always has `steps + 1` entries;
/// the ensemble is present only when requested and every member matches
/// the primary trajectory's length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntegrationResult {
    pub trajectory: Trajectory,
    pub ensemble: Option<Vec<Trajectory>>,
    /// Largest relative specific-energy deviation seen across the primary
    /// trajectory and all ensemble members.
    pub energy_error: Float,
}

/// Integrate with a caller-supplied random source for the ensemble cloud.
///
/// Injecting a seeded generator makes ensemble runs reproducible; the
/// trajectory itself is deterministic either way.
pub fn integrate_with_rng<R: Rng + ?Sized>(
    request: &IntegrationRequest,
    rng: &mut R,
) -> Result<IntegrationResult, EngineError> {
    if !request.time_step.is_finite() || request.time_step <= 0.0 {
        return Err(EngineError::InvalidTimeStep(request.time_step));
    }

    log::debug!(
        "integrating {} steps of {} in {} units (ensemble size: {})",
        request.steps,
        request.time_step,
        request.units,
        if request.compute_ensemble {
            request.ensemble_size
        } else {
            0
        },
    );

    let leapfrog = Leapfrog::new(request.mass, request.time_step, request.units);
    let trajectory = leapfrog.trajectory(request.position, request.velocity, request.steps);

    let ensemble = if request.compute_ensemble {
        let seeds = ensemble::perturbed_seeds(
            request.position,
            request.velocity,
            request.ensemble_size,
            rng,
        );
        Some(ensemble::propagate(&leapfrog, &seeds, request.steps))
    } else {
        None
    };

    let mut energy_error = leapfrog.energy_drift(&trajectory);
    if let Some(members) = &ensemble {
        for member in members {
            energy_error = energy_error.max(leapfrog.energy_drift(member));
        }
    }

    if contains_non_finite(&trajectory) {
        log::warn!("trajectory contains non-finite samples; the caller is expected to filter them before rendering");
    }

    Ok(IntegrationResult {
        trajectory,
        ensemble,
        energy_error,
    })
}

/// Integrate with an entropy-seeded random source. See
/// [`integrate_with_rng`] for the reproducible variant.
pub fn integrate(request: &IntegrationRequest) -> Result<IntegrationResult, EngineError> {
    integrate_with_rng(request, &mut rand::thread_rng())
}
