use rand::Rng;
use rayon::prelude::*;

use crate::propagator::{Leapfrog, Trajectory};
use crate::state::{norm, PhasePoint};
use crate::units::{Float, Vector, DIMENSIONALITY};

/// Standard deviation of the initial-condition cloud, in the active unit
/// system's position and velocity units.
pub const PERTURBATION_SIGMA: Float = 1e-4;

// Box-Muller transform over two independent uniform draws. The first draw
// is redrawn on exactly zero so the logarithm stays finite.
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> Float {
    let mut u: Float = rng.gen();
    while u == 0.0 {
        u = rng.gen();
    }
    let v: Float = rng.gen();
    (-2.0 * u.ln()).sqrt() * (std::f64::consts::TAU * v).cos()
}

/// Seed `count` initial states clustered around the given one. Every
/// component of every seed gets its own independent Gaussian offset.
pub fn perturbed_seeds<R: Rng + ?Sized>(
    position: Vector,
    velocity: Vector,
    count: usize,
    rng: &mut R,
) -> Vec<PhasePoint> {
    (0..count)
        .map(|_| {
            let mut seed = PhasePoint { position, velocity };
            for k in 0..DIMENSIONALITY {
                seed.position[k] += standard_normal(rng) * PERTURBATION_SIGMA;
            }
            for k in 0..DIMENSIONALITY {
                seed.velocity[k] += standard_normal(rng) * PERTURBATION_SIGMA;
            }
            seed
        })
        .collect()
}

/// Propagate every seed through the same number of steps with the same
/// propagator. Members only interact with the central mass, never with
/// each other, so they integrate independently and in parallel; every
/// returned trajectory has `steps + 1` entries.
pub fn propagate(leapfrog: &Leapfrog, seeds: &[PhasePoint], steps: usize) -> Vec<Trajectory> {
    seeds
        .par_iter()
        .map(|seed| leapfrog.trajectory(seed.position, seed.velocity, steps))
        .collect()
}

/// Mean pairwise distance between member positions at one step index, the
/// quantity the cloud view renders to show divergence. All trajectories
/// must be at least `step + 1` long.
pub fn mean_pairwise_distance(ensemble: &[Trajectory], step: usize) -> Float {
    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..ensemble.len() {
        for j in (i + 1)..ensemble.len() {
            let a = &ensemble[i][step].position;
            let b = &ensemble[j][step].position;
            let mut separation = [0.0; DIMENSIONALITY];
            for k in 0..DIMENSIONALITY {
                separation[k] = a[k] - b[k];
            }
            total += norm(&separation);
            pairs += 1;
        }
    }
    if pairs == 0 {
        0.0
    } else {
        total / pairs as Float
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::UnitSystem;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn standard_normal_has_unit_moments() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 10_000;
        let draws: Vec<Float> = (0..n).map(|_| standard_normal(&mut rng)).collect();
        let mean = draws.iter().sum::<Float>() / n as Float;
        let variance = draws.iter().map(|z| (z - mean) * (z - mean)).sum::<Float>() / n as Float;
        println!("mean: {}, variance: {}", mean, variance);
        assert!(mean.abs() < 0.05);
        assert!(variance > 0.9 && variance < 1.1);
    }

    #[test]
    fn seeds_cluster_tightly_around_the_input_state() {
        let mut rng = StdRng::seed_from_u64(42);
        let position = [8.0, 0.0, 0.0];
        let velocity = [0.0, 220.0, 0.0];
        let seeds = perturbed_seeds(position, velocity, 100, &mut rng);
        assert_eq!(seeds.len(), 100);
        for seed in &seeds {
            for k in 0..DIMENSIONALITY {
                assert!((seed.position[k] - position[k]).abs() < 1e-3);
                assert!((seed.velocity[k] - velocity[k]).abs() < 1e-3);
            }
        }
        // The cloud is a spread of distinct states, not copies.
        assert!(seeds.iter().any(|seed| seed.position != position));
    }

    #[test]
    fn same_seed_reproduces_the_same_cloud() {
        let seeds_a = perturbed_seeds(
            [1.0, 0.0, 0.0],
            [0.0, 6.28, 0.0],
            50,
            &mut StdRng::seed_from_u64(9),
        );
        let seeds_b = perturbed_seeds(
            [1.0, 0.0, 0.0],
            [0.0, 6.28, 0.0],
            50,
            &mut StdRng::seed_from_u64(9),
        );
        assert_eq!(seeds_a, seeds_b);
    }

    #[test]
    fn every_member_matches_the_primary_length() {
        let leapfrog = Leapfrog::new(1.0, 0.01, UnitSystem::SolarSystem);
        let mut rng = StdRng::seed_from_u64(3);
        let seeds = perturbed_seeds([1.0, 0.0, 0.0], [0.0, 6.28, 0.0], 5, &mut rng);
        let members = propagate(&leapfrog, &seeds, 50);
        assert_eq!(members.len(), 5);
        for member in &members {
            assert_eq!(member.len(), 51);
        }
    }

    #[test]
    fn parallel_propagation_matches_member_by_member_runs() {
        let leapfrog = Leapfrog::new(1.0, 0.01, UnitSystem::SolarSystem);
        let mut rng = StdRng::seed_from_u64(11);
        let seeds = perturbed_seeds([1.0, 0.0, 0.0], [0.0, 5.0, 0.0], 8, &mut rng);
        let parallel = propagate(&leapfrog, &seeds, 200);
        for (seed, member) in seeds.iter().zip(parallel.iter()) {
            let serial = leapfrog.trajectory(seed.position, seed.velocity, 200);
            assert_eq!(member, &serial);
        }
    }

    #[test]
    fn eccentric_cloud_spreads_out_over_time() {
        // A strongly eccentric orbit with a close pericenter passage shears
        // neighboring initial conditions apart.
        let leapfrog = Leapfrog::new(1.0, 1e-3, UnitSystem::SolarSystem);
        let mut rng = StdRng::seed_from_u64(2024);
        let seeds = perturbed_seeds([1.0, 0.0, 0.0], [0.0, 3.0, 0.0], 20, &mut rng);
        let members = propagate(&leapfrog, &seeds, 2000);

        let initial = mean_pairwise_distance(&members, 0);
        let last = members[0].len() - 1;
        let final_spread = mean_pairwise_distance(&members, last);
        println!("initial spread: {}, final spread: {}", initial, final_spread);
        assert!(final_spread > initial);
    }

    #[test]
    fn spread_of_fewer_than_two_members_is_zero() {
        let leapfrog = Leapfrog::new(1.0, 0.01, UnitSystem::SolarSystem);
        let lone = vec![leapfrog.trajectory([1.0, 0.0, 0.0], [0.0, 6.28, 0.0], 10)];
        assert_eq!(mean_pairwise_distance(&lone, 5), 0.0);
        assert_eq!(mean_pairwise_distance(&[], 0), 0.0);
    }
}
