use std::collections::HashMap;

use crate::topology::Shape;

/// A shape as it appears in a BREP file: a topology entity or the root
/// compound grouping the free shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrepShape {
    Shape(Shape),
    Compound,
}

/// Identities assigned to shapes in the order they are written.
///
/// Identities start at 1. A shape is numbered after all of its
/// sub-shapes, so the root compound always has the largest identity.
#[derive(Debug, Clone, Default)]
pub struct ShapeNumbering {
    order: Vec<BrepShape>,
    ids: HashMap<BrepShape, u32>,
}

impl ShapeNumbering {
    /// Numbers `shape` unless it already has an identity, returning it.
    pub(crate) fn assign(&mut self, shape: BrepShape) -> u32 {
        if let Some(&id) = self.ids.get(&shape) {
            return id;
        }
        self.order.push(shape);
        let id = u32::try_from(self.order.len()).unwrap_or(u32::MAX);
        self.ids.insert(shape, id);
        id
    }

    /// Returns the identity of a written topology entity.
    #[must_use]
    pub fn id(&self, shape: Shape) -> Option<u32> {
        self.ids.get(&BrepShape::Shape(shape)).copied()
    }

    /// Returns the identity of a shape in the file's reference convention,
    /// which counts from the last written shape.
    #[must_use]
    pub fn file_ref(&self, shape: BrepShape) -> Option<u32> {
        let id = *self.ids.get(&shape)?;
        Some(self.len() - id + 1)
    }

    /// Iterates over the written shapes in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, BrepShape)> + '_ {
        (1u32..).zip(self.order.iter().copied())
    }

    /// Number of written shapes.
    #[must_use]
    pub fn len(&self) -> u32 {
        u32::try_from(self.order.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
