use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub type Float = f64;
pub const DIMENSIONALITY: usize = 3;
pub type Vector = [Float; DIMENSIONALITY];

//Galactic system:
//Measuring distances in kpc, velocities in km/s, time in Myr, masses in 1e10 M_sun
const GALACTIC_G: Float = 4.30091e-6; // kpc (km/s)^2 / M_sun
const KM_S_MYR_TO_KPC: Float = 1.022712165e-3;
const KPC_MYR2_TO_KM_S_MYR: Float = 977.79222;
const GALACTIC_MASS_SCALE: Float = 1e10;

//Solar system:
//Measuring distances in AU, velocities in AU/yr, time in yr, masses in M_sun
// AU = (G M_sun yr^2 / (4 Pi^2))^(1/3) => G = 4 Pi^2 AU^3 / (M_sun yr^2)
const SOLAR_G: Float = 39.4784176;

/// The two unit systems the engine runs in, matching the wire names used by
/// the rest of the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Galactic,
    SolarSystem,
}

/// Physical constants and conversion factors bound to one [`UnitSystem`],
/// fixed for the whole integration run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitConfiguration {
    pub gravitational_constant: Float,
    /// Converts a velocity carried over one time step into a position
    /// increment in the system's length unit.
    pub position_scale: Float,
    /// Reserved at 1.0 for both systems; velocities are not rescaled.
    pub velocity_scale: Float,
    /// Converts the raw inverse-square acceleration into the system's
    /// velocity-per-time unit.
    pub acceleration_scale: Float,
    /// Converts the nominal mass supplied by the caller into physical mass.
    pub mass_scale: Float,
}

impl UnitSystem {
    pub fn configuration(self) -> UnitConfiguration {
        match self {
            UnitSystem::Galactic => UnitConfiguration {
                gravitational_constant: GALACTIC_G,
                position_scale: KM_S_MYR_TO_KPC,
                velocity_scale: 1.0,
                acceleration_scale: KPC_MYR2_TO_KM_S_MYR,
                mass_scale: GALACTIC_MASS_SCALE,
            },
            UnitSystem::SolarSystem => UnitConfiguration {
                gravitational_constant: SOLAR_G,
                position_scale: 1.0,
                velocity_scale: 1.0,
                acceleration_scale: 1.0,
                mass_scale: 1.0,
            },
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnitSystem::Galactic => "galactic",
            UnitSystem::SolarSystem => "solarsystem",
        })
    }
}

impl FromStr for UnitSystem {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "galactic" => Ok(UnitSystem::Galactic),
            "solarsystem" => Ok(UnitSystem::SolarSystem),
            other => Err(EngineError::InvalidUnitSystem(other.to_string())),
        }
    }
}
