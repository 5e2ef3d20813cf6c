use crate::error::{OperationError, Result};
use crate::math::{Point3, Vector3};
use crate::shape_graph::ShapeGraph;
use crate::topology::Shape;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Returns the size of the box along each axis.
    #[must_use]
    pub fn extent(&self) -> Vector3 {
        self.max - self.min
    }

    /// Returns the largest size of the box along any axis.
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        self.extent().max()
    }

    /// Estimates a global mesh step as `max_extent / divisor`.
    #[must_use]
    pub fn mesh_step_estimate(&self, divisor: f64) -> f64 {
        self.max_extent() / divisor
    }
}

/// Computes the axis-aligned bounding box of all vertices of a shape graph.
#[derive(Debug, Default)]
pub struct BoundingBox;

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the query, returning the AABB.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::EmptyShapeSet`] if the graph tracks no
    /// vertex.
    pub fn execute(&self, graph: &ShapeGraph) -> Result<Aabb> {
        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut any = false;

        for (_, record) in graph.records() {
            let Shape::Vertex(id) = record.shape else {
                continue;
            };
            let p = graph.store().vertex(id)?.point;
            min = min.inf(&p);
            max = max.sup(&p);
            any = true;
        }

        if !any {
            return Err(OperationError::EmptyShapeSet.into());
        }
        Ok(Aabb { min, max })
    }
}
