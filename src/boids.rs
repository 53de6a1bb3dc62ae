use serde::{Deserialize, Serialize};

use crate::vector::{Planar, Vec2};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boid {
    id: usize,
    pub position: Vec2,
    pub velocity: Vec2,
    heading: f64,
}

/// What a renderer needs to draw one boid after a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoidView {
    pub position: Vec2,
    pub heading: f64,
}

impl Boid {
    pub fn new(id: usize, position: Vec2, velocity: Vec2) -> Self {
        Boid {
            id,
            position,
            velocity,
            heading: velocity.heading_angle(),
        }
    }

    /// Index of this boid within its flock.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Advances the position by one frame of velocity and refreshes the heading.
    pub fn commit(&mut self) {
        self.position += self.velocity;
        self.heading = self.velocity.heading_angle();
    }

    pub(crate) fn refresh_heading(&mut self) {
        self.heading = self.velocity.heading_angle();
    }

    pub fn view(&self) -> BoidView {
        BoidView {
            position: self.position,
            heading: self.heading,
        }
    }
}
