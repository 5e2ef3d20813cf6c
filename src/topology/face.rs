use crate::geometry::surface::Plane;

use super::wire::WireId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the topology store.
    pub struct FaceId;
}

/// A polygon of the decomposition lying on its supporting plane.
///
/// The outer wire runs counter-clockwise around the plane normal and the
/// holes clockwise, so the face always lies on the left of its wires.
#[derive(Debug, Clone)]
pub struct FaceData {
    pub plane: Plane,
    /// The outer boundary.
    pub outer_wire: WireId,
    pub holes: Vec<WireId>,
}

impl FaceData {
    /// Creates a face without holes.
    #[must_use]
    pub fn new(plane: Plane, outer_wire: WireId) -> Self {
        Self {
            plane,
            outer_wire,
            holes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_holes(mut self, holes: Vec<WireId>) -> Self {
        self.holes = holes;
        self
    }

    /// Iterates over the outer wire followed by the holes.
    pub fn wires(&self) -> impl Iterator<Item = WireId> + '_ {
        std::iter::once(self.outer_wire).chain(self.holes.iter().copied())
    }
}
