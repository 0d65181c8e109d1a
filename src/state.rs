use serde::{Deserialize, Serialize};

use crate::units::{Float, Vector, DIMENSIONALITY};

/// Mutable per-particle scratch state, advanced in place once per step.
///
/// The acceleration is a derived quantity; it always holds the value
/// computed for the current position and is carried between steps so the
/// leading half-kick of the next step can reuse it.
#[derive(Clone, Debug)]
pub struct PhysicalState {
    pub position: Vector,
    pub velocity: Vector,
    pub acceleration: Vector,
}

impl PhysicalState {
    pub fn new(position: Vector, velocity: Vector) -> PhysicalState {
        PhysicalState {
            position,
            velocity,
            acceleration: [0.0; DIMENSIONALITY],
        }
    }

    pub(crate) fn sample(&self) -> PhasePoint {
        PhasePoint {
            position: self.position,
            velocity: self.velocity,
        }
    }
}

/// One recorded trajectory sample. Acceleration is deliberately excluded;
/// only position and velocity survive a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhasePoint {
    pub position: Vector,
    pub velocity: Vector,
}

impl PhasePoint {
    pub fn is_finite(&self) -> bool {
        self.position
            .iter()
            .chain(self.velocity.iter())
            .all(|x| x.is_finite())
    }
}

pub(crate) fn norm(v: &Vector) -> Float {
    v.iter().map(|x| x * x).sum::<Float>().sqrt()
}
