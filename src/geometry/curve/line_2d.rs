use crate::math::{Point2, Vector2};

/// A line in the parameter space of a surface, used as the 2D
/// representation of an edge lying on that surface.
///
/// The parametric form is: `P(t) = origin + t * direction`. The direction
/// is not normalized, so that `t` matches the parameter of the edge's 3D
/// curve.
#[derive(Debug, Clone)]
pub struct Line2d {
    origin: Point2,
    direction: Vector2,
}

impl Line2d {
    /// Creates the parameter line passing through `start` at `t = 0` and
    /// through `end` at `t = t_end`.
    #[must_use]
    pub fn between(start: Point2, end: Point2, t_end: f64) -> Self {
        Self {
            origin: start,
            direction: (end - start) / t_end,
        }
    }

    /// Returns the origin point of the line.
    #[must_use]
    pub fn origin(&self) -> &Point2 {
        &self.origin
    }

    /// Returns the direction vector of the line.
    #[must_use]
    pub fn direction(&self) -> &Vector2 {
        &self.direction
    }

    /// Returns the point at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.origin + self.direction * t
    }
}
