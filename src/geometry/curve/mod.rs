mod line;
mod line_2d;

pub use line::Line;
pub use line_2d::Line2d;

use crate::math::Point3;

/// A curve in 3D space parameterized by `t`.
///
/// Edges store the parameters of their end vertices next to the curve, so
/// the curve itself is unbounded.
pub trait Curve {
    /// Returns the parameter of the point of the curve closest to `point`.
    fn parameter_of(&self, point: &Point3) -> f64;
}
