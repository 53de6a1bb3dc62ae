use nalgebra::Vector2;

/// Positions and velocities share one representation.
pub type Vec2 = Vector2<f64>;

pub trait Planar {
    /// Signed angle from the positive x-axis, in radians within `(-pi, pi]`.
    fn heading_angle(&self) -> f64;
    fn distance_to(&self, other: &Self) -> f64;
}

impl Planar for Vec2 {
    fn heading_angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    fn distance_to(&self, other: &Self) -> f64 {
        (self - other).norm()
    }
}
