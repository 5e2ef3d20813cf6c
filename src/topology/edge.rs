use crate::geometry::curve::{Line, Line2d};

use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the topology store.
    pub struct EdgeId;
}

/// Data associated with a topological edge.
///
/// An edge connects two vertices and carries a 3D line together with its
/// representation in the parameter space of the surface it lies on.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Start vertex of the edge.
    pub start: VertexId,
    /// End vertex of the edge.
    pub end: VertexId,
    /// The 3D curve defining this edge's shape.
    pub curve: Line,
    /// The same curve in the `(u, v)` space of the supporting plane.
    pub pcurve: Option<Line2d>,
    /// Parameter on the curve corresponding to the start vertex.
    pub t_start: f64,
    /// Parameter on the curve corresponding to the end vertex.
    pub t_end: f64,
}

impl EdgeData {
    /// Returns the vertex at which the edge starts when traversed with the
    /// given orientation.
    #[must_use]
    pub fn first_vertex(&self, forward: bool) -> VertexId {
        if forward {
            self.start
        } else {
            self.end
        }
    }

    /// Returns the vertex at which the edge ends when traversed with the
    /// given orientation.
    #[must_use]
    pub fn last_vertex(&self, forward: bool) -> VertexId {
        if forward {
            self.end
        } else {
            self.start
        }
    }
}
