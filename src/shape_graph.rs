//! Bookkeeping of every shape that the external mesher may see.

use std::collections::HashMap;

use crate::error::TopologyError;
use crate::geometry::surface::Plane;
use crate::region::{RegionId, UNASSIGNED};
use crate::topology::{Dimension, Shape, TopologyStore};

/// Stable identifier of a [`ShapeRecord`]: its position in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(usize);

impl RecordId {
    /// Returns the position of the record in its graph.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One tracked shape (vertex, edge, face or solid) with its region and
/// the state used by mesh-step propagation.
#[derive(Debug, Clone)]
pub struct ShapeRecord {
    pub shape: Shape,
    pub dimension: Dimension,
    /// Region owning the shape, [`UNASSIGNED`] for structural sub-shapes.
    pub region_id: RegionId,
    /// Whether the shape was explicitly tagged with a region.
    pub is_free: bool,
    /// Requested mesh step, `+inf` until propagation reaches the shape.
    pub mesh_step: f64,
    /// Index of the last propagation pass that visited the shape.
    pub visit_generation: Option<usize>,
}

impl ShapeRecord {
    fn new(shape: Shape, region_id: RegionId) -> Result<Self, TopologyError> {
        let dimension = shape.dimension().ok_or_else(|| {
            TopologyError::InvalidTopology(format!("{shape:?} has no dimension and cannot be tracked"))
        })?;
        Ok(Self {
            shape,
            dimension,
            region_id,
            is_free: region_id != UNASSIGNED,
            mesh_step: f64::INFINITY,
            visit_generation: None,
        })
    }

    fn reset(&mut self) {
        self.mesh_step = f64::INFINITY;
        self.visit_generation = None;
    }
}

/// The topology arena together with a record for every tracked shape.
///
/// Records are kept in creation order; this order is the tie-breaker for
/// every later enumeration, which keeps runs reproducible.
#[derive(Debug, Default)]
pub struct ShapeGraph {
    store: TopologyStore,
    records: Vec<ShapeRecord>,
    by_shape: HashMap<Shape, RecordId>,
    plane: Option<Plane>,
}

impl ShapeGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TopologyStore {
        &mut self.store
    }

    /// The plane supporting all imported faces, once the first
    /// decomposition has been imported.
    #[must_use]
    pub fn plane(&self) -> Option<&Plane> {
        self.plane.as_ref()
    }

    pub(crate) fn set_plane(&mut self, plane: Plane) {
        self.plane = Some(plane);
    }

    /// Starts tracking `shape`, owned by `region_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidTopology`] for wires and shells and
    /// for shapes that are already tracked.
    pub fn add_record(&mut self, shape: Shape, region_id: RegionId) -> Result<RecordId, TopologyError> {
        if self.by_shape.contains_key(&shape) {
            return Err(TopologyError::InvalidTopology(format!("{shape:?} is already tracked")));
        }
        let record = ShapeRecord::new(shape, region_id)?;
        let id = RecordId(self.records.len());
        self.records.push(record);
        self.by_shape.insert(shape, id);
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if the id does not belong to this graph.
    pub fn record(&self, id: RecordId) -> Result<&ShapeRecord, TopologyError> {
        self.records
            .get(id.0)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("shape record {}", id.0)))
    }

    /// # Errors
    ///
    /// Returns an error if the id does not belong to this graph.
    pub fn record_mut(&mut self, id: RecordId) -> Result<&mut ShapeRecord, TopologyError> {
        self.records
            .get_mut(id.0)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("shape record {}", id.0)))
    }

    /// Returns the record tracking `shape`, if any.
    #[must_use]
    pub fn record_of(&self, shape: Shape) -> Option<RecordId> {
        self.by_shape.get(&shape).copied()
    }

    /// Iterates over all records in creation order.
    pub fn records(&self) -> impl Iterator<Item = (RecordId, &ShapeRecord)> {
        self.records.iter().enumerate().map(|(i, r)| (RecordId(i), r))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the free records, highest dimension first. Records of equal
    /// dimension keep their creation order.
    #[must_use]
    pub fn free_records(&self) -> Vec<RecordId> {
        let mut free: Vec<RecordId> = self
            .records()
            .filter(|(_, r)| r.is_free)
            .map(|(id, _)| id)
            .collect();
        free.sort_by_key(|id| std::cmp::Reverse(self.records[id.0].dimension));
        free
    }

    /// Restores `mesh_step` and `visit_generation` of every record to their
    /// initial values.
    pub fn reset_propagation(&mut self) {
        for record in &mut self.records {
            record.reset();
        }
    }
}
