use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::{Parameters, boids::Boid, vector::Vec2};

/// Seeds `params.population` boids. Position components are integers drawn
/// from `[0, bound_max)` and velocity components integers from
/// `[0, initial_speed)`, each drawn independently.
pub fn seed<R: Rng>(params: &Parameters, rng: &mut R) -> Vec<Boid> {
    let bound = params.bound_max.floor().max(1.0) as u32;
    (0..params.population)
        .map(|id| {
            let velocity = Vec2::new(
                rng.random_range(0..params.initial_speed) as f64,
                rng.random_range(0..params.initial_speed) as f64,
            );
            let position = Vec2::new(
                rng.random_range(0..bound) as f64,
                rng.random_range(0..bound) as f64,
            );
            Boid::new(id, position, velocity)
        })
        .collect()
}

/// Seeds a population from `params.rng_seed`, or from the thread RNG when unset.
pub fn populate(params: &Parameters) -> Vec<Boid> {
    match params.rng_seed {
        Some(seed_value) => {
            debug!(seed = seed_value, population = params.population, "seeding population");
            seed(params, &mut StdRng::seed_from_u64(seed_value))
        }
        None => {
            debug!(population = params.population, "seeding population from thread rng");
            seed(params, &mut rand::rng())
        }
    }
}
