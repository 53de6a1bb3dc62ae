//! The per-boid steering pipeline.
//!
//! Each rule reads the acting boid and the state of its neighbours and writes
//! only the acting boid. The neighbour-based rules leave the boid untouched
//! when it has no neighbours.

use crate::{
    Parameters,
    boids::Boid,
    vector::{Planar, Vec2},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Cohesion,
    Separation,
    Alignment,
    Containment,
    SpeedCap,
}

/// Application order. Reordering changes the emergent motion.
pub const PIPELINE: [Rule; 5] = [
    Rule::Cohesion,
    Rule::Separation,
    Rule::Alignment,
    Rule::Containment,
    Rule::SpeedCap,
];

impl Rule {
    pub fn apply(self, boid: &mut Boid, flock: &[Boid], neighbors: &[usize], params: &Parameters) {
        match self {
            Rule::Cohesion => cohesion(boid, flock, neighbors, params.cohesion_gain),
            Rule::Separation => separation(
                boid,
                flock,
                neighbors,
                params.personal_space_radius,
                params.separation_gain,
            ),
            Rule::Alignment => alignment(boid, flock, neighbors, params.alignment_gain),
            Rule::Containment => contain(boid, params.bound_max),
            Rule::SpeedCap => cap_speed(boid, params.speed_cap),
        }
    }
}

/// Steer toward the centroid of the neighbours.
pub fn cohesion(boid: &mut Boid, flock: &[Boid], neighbors: &[usize], gain: f64) {
    if neighbors.is_empty() {
        return;
    }
    let sum = neighbors
        .iter()
        .fold(Vec2::zeros(), |acc, &idx| acc + flock[idx].position);
    let centroid = sum / neighbors.len() as f64;
    boid.velocity += (centroid - boid.position) * gain;
}

/// Steer away from neighbours strictly inside the personal space radius.
pub fn separation(
    boid: &mut Boid,
    flock: &[Boid],
    neighbors: &[usize],
    personal_space: f64,
    gain: f64,
) {
    if neighbors.is_empty() {
        return;
    }
    let mut away = Vec2::zeros();
    for &idx in neighbors {
        let other = &flock[idx];
        if boid.position.distance_to(&other.position) < personal_space {
            away += boid.position - other.position;
        }
    }
    boid.velocity += away * gain;
}

/// Steer toward the mean velocity of the neighbours.
pub fn alignment(boid: &mut Boid, flock: &[Boid], neighbors: &[usize], gain: f64) {
    if neighbors.is_empty() {
        return;
    }
    let sum = neighbors
        .iter()
        .fold(Vec2::zeros(), |acc, &idx| acc + flock[idx].velocity);
    let mean = sum / neighbors.len() as f64;
    boid.velocity += (mean - boid.velocity) * gain;
}

/// Bounce off the walls of the `[0, bound_max]` square.
pub fn contain(boid: &mut Boid, bound_max: f64) {
    for axis in 0..2 {
        if boid.position[axis] < 0.0 {
            boid.velocity[axis] = -boid.velocity[axis];
            boid.position[axis] = 0.0;
        } else if boid.position[axis] > bound_max {
            boid.velocity[axis] = -boid.velocity[axis];
            boid.position[axis] = bound_max;
        }
    }
}

pub fn cap_speed(boid: &mut Boid, speed_cap: f64) {
    let speed = boid.velocity.norm();
    if speed > speed_cap {
        boid.velocity *= speed_cap / speed;
    }
}

/// Runs the whole pipeline for one boid and commits its movement.
///
/// The moved position is contained again, so a boid always ends the frame
/// inside the world.
pub fn advance(boid: &mut Boid, flock: &[Boid], neighbors: &[usize], params: &Parameters) {
    for rule in PIPELINE {
        rule.apply(boid, flock, neighbors, params);
    }
    boid.commit();
    contain(boid, params.bound_max);
    boid.refresh_heading();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Parameters {
        Parameters::default()
    }

    #[test]
    fn cohesion_pulls_toward_centroid() {
        let flock = vec![
            Boid::new(0, Vec2::new(100.0, 100.0), Vec2::zeros()),
            Boid::new(1, Vec2::new(110.0, 100.0), Vec2::zeros()),
            Boid::new(2, Vec2::new(110.0, 120.0), Vec2::zeros()),
        ];
        let mut boid = flock[0].clone();
        cohesion(&mut boid, &flock, &[1, 2], 0.5);
        // centroid (110, 110), delta (10, 10)
        assert_eq!(boid.velocity, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn separation_ignores_neighbours_at_the_threshold() {
        let flock = vec![
            Boid::new(0, Vec2::new(100.0, 100.0), Vec2::zeros()),
            Boid::new(1, Vec2::new(116.0, 100.0), Vec2::zeros()),
        ];
        let mut boid = flock[0].clone();
        separation(&mut boid, &flock, &[1], 16.0, 1.0);
        assert_eq!(boid.velocity, Vec2::zeros());
    }

    #[test]
    fn separation_pushes_away_from_crowding_neighbours() {
        let flock = vec![
            Boid::new(0, Vec2::new(100.0, 100.0), Vec2::zeros()),
            Boid::new(1, Vec2::new(104.0, 100.0), Vec2::zeros()),
            Boid::new(2, Vec2::new(100.0, 97.0), Vec2::zeros()),
            Boid::new(3, Vec2::new(150.0, 100.0), Vec2::zeros()),
        ];
        let mut boid = flock[0].clone();
        separation(&mut boid, &flock, &[1, 2, 3], 16.0, 0.5);
        assert_eq!(boid.velocity, Vec2::new(-2.0, 1.5));
    }

    #[test]
    fn alignment_moves_toward_mean_velocity() {
        let flock = vec![
            Boid::new(0, Vec2::zeros(), Vec2::new(0.0, 0.0)),
            Boid::new(1, Vec2::zeros(), Vec2::new(4.0, 0.0)),
            Boid::new(2, Vec2::zeros(), Vec2::new(0.0, 4.0)),
        ];
        let mut boid = flock[0].clone();
        alignment(&mut boid, &flock, &[1, 2], 0.5);
        assert_eq!(boid.velocity, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn neighbour_rules_are_no_ops_without_neighbours() {
        let flock = vec![Boid::new(0, Vec2::new(5.0, 5.0), Vec2::new(1.0, -2.0))];
        let mut boid = flock[0].clone();
        cohesion(&mut boid, &flock, &[], 1.0);
        separation(&mut boid, &flock, &[], 16.0, 1.0);
        alignment(&mut boid, &flock, &[], 1.0);
        assert_eq!(boid, flock[0]);
    }

    #[test]
    fn containment_reflects_and_clamps() {
        let mut boid = Boid::new(0, Vec2::new(-5.0, 40.0), Vec2::new(3.0, 2.0));
        contain(&mut boid, 800.0);
        assert_eq!(boid.position, Vec2::new(0.0, 40.0));
        assert_eq!(boid.velocity, Vec2::new(-3.0, 2.0));

        let mut boid = Boid::new(0, Vec2::new(400.0, 812.0), Vec2::new(1.0, 4.0));
        contain(&mut boid, 800.0);
        assert_eq!(boid.position, Vec2::new(400.0, 800.0));
        assert_eq!(boid.velocity, Vec2::new(1.0, -4.0));
    }

    #[test]
    fn speed_cap_preserves_direction() {
        let mut boid = Boid::new(0, Vec2::zeros(), Vec2::new(30.0, 40.0));
        cap_speed(&mut boid, 6.0);
        assert!((boid.velocity - Vec2::new(3.6, 4.8)).norm() < 1e-12);

        let mut slow = Boid::new(0, Vec2::zeros(), Vec2::new(1.0, 1.0));
        cap_speed(&mut slow, 6.0);
        assert_eq!(slow.velocity, Vec2::new(1.0, 1.0));

        let mut still = Boid::new(0, Vec2::zeros(), Vec2::zeros());
        cap_speed(&mut still, 6.0);
        assert_eq!(still.velocity, Vec2::zeros());
    }

    #[test]
    fn advance_on_isolated_boid_only_moves_it() {
        let flock = vec![Boid::new(0, Vec2::new(400.0, 400.0), Vec2::new(2.0, 1.0))];
        let mut boid = flock[0].clone();
        advance(&mut boid, &flock, &[], &params());
        assert_eq!(boid.velocity, Vec2::new(2.0, 1.0));
        assert_eq!(boid.position, Vec2::new(402.0, 401.0));
        assert_eq!(boid.heading(), Vec2::new(2.0, 1.0).heading_angle());
    }

    #[test]
    fn advance_never_leaves_the_world() {
        let flock = vec![Boid::new(0, Vec2::new(798.0, 1.0), Vec2::new(5.0, -3.0))];
        let mut boid = flock[0].clone();
        advance(&mut boid, &flock, &[], &params());
        assert_eq!(boid.position, Vec2::new(800.0, 0.0));
        assert_eq!(boid.velocity, Vec2::new(-5.0, 3.0));
        assert_eq!(boid.heading(), Vec2::new(-5.0, 3.0).heading_angle());
    }
}
