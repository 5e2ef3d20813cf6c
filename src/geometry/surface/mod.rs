mod plane;

pub use plane::Plane;

use crate::math::{Point2, Point3};

/// A surface in 3D space parameterized by `(u, v)`.
///
/// Edges lying on a surface also carry their curve in this parameter
/// space, which is what the BREP format expects for faces.
pub trait Surface {
    /// Returns the parameters of the point of the surface closest to
    /// `point`.
    fn parameters_of(&self, point: &Point3) -> Point2;
}
