use crate::state::{norm, PhasePoint, PhysicalState};
use crate::units::{Float, UnitConfiguration, UnitSystem, Vector, DIMENSIONALITY};

/// A time-ordered sequence of samples; entry 0 is the initial state.
pub type Trajectory = Vec<PhasePoint>;

/// Kick-drift-kick propagator for a test particle around a point mass
/// fixed at the origin.
///
/// The scheme is symplectic, so the energy error of a bound orbit stays
/// bounded instead of drifting, which is what lets the surrounding
/// application trust locally computed trajectories until the reference
/// backend answers.
pub struct Leapfrog {
    gm: Float,
    time_step: Float,
    units: UnitConfiguration,
}

impl Leapfrog {
    /// `mass` is the nominal mass in the unit system's counting convention;
    /// the configuration's mass scale turns it into physical mass.
    pub fn new(mass: Float, time_step: Float, units: UnitSystem) -> Leapfrog {
        let units = units.configuration();
        Leapfrog {
            gm: units.gravitational_constant * mass * units.mass_scale,
            time_step,
            units,
        }
    }

    /// Advance one particle by a single step.
    ///
    /// The state must carry the acceleration belonging to its current
    /// position; [`Leapfrog::trajectory`] establishes that before the first
    /// step and every step maintains it.
    pub fn step(&self, state: &mut PhysicalState) {
        let half_step = 0.5 * self.time_step;
        for k in 0..DIMENSIONALITY {
            state.velocity[k] += state.acceleration[k] * half_step;
        }
        for k in 0..DIMENSIONALITY {
            state.position[k] += state.velocity[k] * self.time_step * self.units.position_scale;
        }
        self.update_acceleration(state);
        for k in 0..DIMENSIONALITY {
            state.velocity[k] += state.acceleration[k] * half_step;
        }
    }

    // A particle sitting exactly at the origin yields non-finite
    // acceleration; that is surfaced in the output rather than clamped.
    fn update_acceleration(&self, state: &mut PhysicalState) {
        let r = norm(&state.position);
        let magnitude = -self.gm / (r * r * r) * self.units.acceleration_scale;
        for k in 0..DIMENSIONALITY {
            state.acceleration[k] = magnitude * state.position[k];
        }
    }

    /// Integrate `steps` steps from the given initial conditions and record
    /// every state, the initial one included.
    pub fn trajectory(&self, position: Vector, velocity: Vector, steps: usize) -> Trajectory {
        let mut state = PhysicalState::new(position, velocity);
        self.update_acceleration(&mut state);

        let mut points = Vec::with_capacity(steps + 1);
        points.push(state.sample());
        for _ in 0..steps {
            self.step(&mut state);
            points.push(state.sample());
        }
        points
    }

    /// Specific orbital energy of one sample.
    ///
    /// The velocity is folded through the position scale so the kinetic and
    /// potential terms share length and time units; for the solar-system
    /// configuration this reduces to `v^2 / 2 - G M / r`.
    pub fn specific_energy(&self, point: &PhasePoint) -> Float {
        let r = norm(&point.position);
        let kinetic = point
            .velocity
            .iter()
            .map(|v| v * self.units.position_scale)
            .map(|v| v * v)
            .sum::<Float>()
            / 2.0;
        kinetic - self.units.position_scale * self.units.acceleration_scale * self.gm / r
    }

    /// Largest relative deviation of the specific energy from its initial
    /// value over the whole trajectory.
    pub fn energy_drift(&self, trajectory: &[PhasePoint]) -> Float {
        let reference = match trajectory.first() {
            Some(first) => self.specific_energy(first),
            None => return 0.0,
        };
        trajectory
            .iter()
            .map(|point| ((self.specific_energy(point) - reference) / reference).abs())
            .fold(0.0, Float::max)
    }
}

/// True if any recorded component has left the representable range.
pub fn contains_non_finite(trajectory: &[PhasePoint]) -> bool {
    trajectory.iter().any(|point| !point.is_finite())
}
