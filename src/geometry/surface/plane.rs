use crate::error::{GeometryError, Result};
use crate::math::{Point2, Point3, Vector3, TOLERANCE};

use super::Surface;

/// An infinite plane in 3D space.
///
/// Defined by an origin point, and two orthogonal direction vectors
/// (`u_dir`, `v_dir`). The normal is `u_dir × v_dir`.
///
/// Parametric form: `P(u, v) = origin + u * u_dir + v * v_dir`.
#[derive(Debug, Clone)]
pub struct Plane {
    origin: Point3,
    u_dir: Vector3,
    v_dir: Vector3,
    normal: Vector3,
}

impl Plane {
    /// Creates a new plane from an origin and two direction vectors.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vectors are zero-length
    /// or parallel (degenerate plane).
    pub fn new(origin: Point3, u_dir: Vector3, v_dir: Vector3) -> Result<Self> {
        let u_len = u_dir.norm();
        if u_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let v_len = v_dir.norm();
        if v_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }

        let u_dir = u_dir / u_len;
        let v_dir = v_dir / v_len;

        let normal = u_dir.cross(&v_dir);
        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(
                GeometryError::Degenerate("plane directions are parallel".into()).into(),
            );
        }
        let normal = normal / normal_len;

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// Creates the `z = 0` plane with its origin at the minimum corner of
    /// the given 2D points. The U and V axes are the X and Y axes.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if no points are given.
    pub fn spanning_xy<'a>(points: impl IntoIterator<Item = &'a Point2>) -> Result<Self> {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        for pt in points {
            min.x = min.x.min(pt.x);
            min.y = min.y.min(pt.y);
        }
        if !min.x.is_finite() || !min.y.is_finite() {
            return Err(
                GeometryError::Degenerate("cannot span a plane over no points".into()).into(),
            );
        }
        Self::new(
            Point3::new(min.x, min.y, 0.0),
            Vector3::x(),
            Vector3::y(),
        )
    }

    /// Returns the origin point of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the U direction vector.
    #[must_use]
    pub fn u_dir(&self) -> &Vector3 {
        &self.u_dir
    }

    /// Returns the V direction vector.
    #[must_use]
    pub fn v_dir(&self) -> &Vector3 {
        &self.v_dir
    }

    /// Returns the unit normal `u_dir × v_dir`.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }
}

impl Surface for Plane {
    /// Orthogonal projection onto the plane.
    fn parameters_of(&self, point: &Point3) -> Point2 {
        let d = point - self.origin;
        Point2::new(d.dot(&self.u_dir), d.dot(&self.v_dir))
    }
}
