//! `nalgebra` aliases shared by the geometry and topology modules.

pub type Point2 = nalgebra::Point2<f64>;
pub type Point3 = nalgebra::Point3<f64>;
pub type Vector2 = nalgebra::Vector2<f64>;
pub type Vector3 = nalgebra::Vector3<f64>;

/// Lengths below this are treated as zero.
pub const TOLERANCE: f64 = 1e-10;

/// Places a point of the decomposition plane at `z = 0`.
#[must_use]
pub fn lift(xy: &Point2) -> Point3 {
    Point3::new(xy.x, xy.y, 0.0)
}
