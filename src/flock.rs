use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    ParameterError, Parameters, UpdateMode,
    boids::{Boid, BoidView},
    neighbors::NeighborFinder,
    population, rules,
    vector::Vec2,
};

/// Aggregate measurements of a flock at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlockStats {
    pub frame: u64,
    pub mean_speed: f64,
    /// Length of the mean unit velocity: 1.0 when every boid heads the same way.
    pub polarisation: f64,
    pub mean_neighbors: f64,
}

pub struct Flock {
    boids: Vec<Boid>,
    params: Parameters,
    finder: NeighborFinder,
    frame: u64,
}

impl Flock {
    /// Builds a flock with a freshly seeded population.
    pub fn new(params: Parameters) -> Result<Self, ParameterError> {
        params.validate()?;
        let boids = population::populate(&params);
        Ok(Self::assemble(params, boids))
    }

    /// Builds a flock from explicit boids. Boids are re-indexed by position in `boids`.
    pub fn from_boids(params: Parameters, boids: Vec<Boid>) -> Result<Self, ParameterError> {
        let params = Parameters {
            population: boids.len(),
            ..params
        };
        params.validate()?;
        let boids = boids
            .into_iter()
            .enumerate()
            .map(|(id, boid)| Boid::new(id, boid.position, boid.velocity))
            .collect();
        Ok(Self::assemble(params, boids))
    }

    fn assemble(params: Parameters, boids: Vec<Boid>) -> Self {
        let finder =
            NeighborFinder::new(params.neighbor_search, &boids, params.neighborhood_radius);
        debug!(
            population = boids.len(),
            mode = %params.update_mode,
            search = %params.neighbor_search,
            "flock assembled"
        );
        Flock {
            boids,
            params,
            finder,
            frame: 0,
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn views(&self) -> impl Iterator<Item = BoidView> + '_ {
        self.boids.iter().map(Boid::view)
    }

    /// Advances every boid by exactly one frame.
    pub fn step(&mut self) {
        match self.params.update_mode {
            UpdateMode::Sequential => self.step_sequential(),
            UpdateMode::Simultaneous => self.step_simultaneous(),
        }
        self.frame += 1;
        if tracing::enabled!(tracing::Level::TRACE) {
            let stats = self.stats();
            trace!(
                frame = stats.frame,
                mean_speed = stats.mean_speed,
                polarisation = stats.polarisation,
                mean_neighbors = stats.mean_neighbors,
                "flock stepped"
            );
        }
    }

    pub fn run(&mut self, frames: u64) {
        for _ in 0..frames {
            self.step();
        }
    }

    // Later boids observe the already-committed state of earlier ones.
    fn step_sequential(&mut self) {
        let radius = self.params.neighborhood_radius;
        for index in 0..self.boids.len() {
            let neighbors = self.finder.neighbors(&self.boids, index, radius);
            let mut boid = self.boids[index].clone();
            let from = boid.position;
            rules::advance(&mut boid, &self.boids, &neighbors, &self.params);
            self.finder.moved(index, &from, &boid.position);
            self.boids[index] = boid;
        }
    }

    // Every boid reads the pre-step snapshot, so results do not depend on order.
    fn step_simultaneous(&mut self) {
        let radius = self.params.neighborhood_radius;
        let snapshot = &self.boids;
        let finder = &self.finder;
        let params = &self.params;
        let next: Vec<Boid> = snapshot
            .par_iter()
            .enumerate()
            .map(|(index, boid)| {
                let neighbors = finder.neighbors(snapshot, index, radius);
                let mut next_boid = boid.clone();
                rules::advance(&mut next_boid, snapshot, &neighbors, params);
                next_boid
            })
            .collect();
        self.boids = next;
        self.finder.rebuild(&self.boids);
    }

    pub fn stats(&self) -> FlockStats {
        let count = self.boids.len() as f64;
        let mean_speed = self.boids.iter().map(|b| b.velocity.norm()).sum::<f64>() / count;
        let heading_sum = self
            .boids
            .iter()
            .filter(|b| b.velocity.norm() > 0.0)
            .fold(Vec2::zeros(), |acc, b| acc + b.velocity.normalize());
        let polarisation = heading_sum.norm() / count;
        let radius = self.params.neighborhood_radius;
        let neighbor_total: usize = (0..self.boids.len())
            .into_par_iter()
            .map(|index| self.finder.neighbors(&self.boids, index, radius).len())
            .sum();
        FlockStats {
            frame: self.frame,
            mean_speed,
            polarisation,
            mean_neighbors: neighbor_total as f64 / count,
        }
    }
}
