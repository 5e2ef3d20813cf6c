//! Reverse lookup from mesher entity ids to shape records.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::brep::ShapeNumbering;
use crate::shape_graph::{RecordId, ShapeGraph};
use crate::topology::Dimension;

/// Maps `(dimension, generator_id)` pairs to shape records and back.
///
/// Generator ids reproduce the mesher's own enumeration of a BREP file:
/// within a dimension, shapes are taken in descending order of their
/// identity in the file and numbered from 1.
#[derive(Debug, Clone, Default)]
pub struct ShapeIndex {
    by_generator: BTreeMap<(Dimension, u32), RecordId>,
    by_record: HashMap<RecordId, (Dimension, u32)>,
}

impl ShapeIndex {
    /// Indexes every record of `graph` whose shape was written to the
    /// BREP file. Records without an identity are left out.
    #[must_use]
    pub fn build(graph: &ShapeGraph, numbering: &ShapeNumbering) -> Self {
        let mut by_dim: [Vec<(u32, RecordId)>; 4] = Default::default();
        for (id, record) in graph.records() {
            if let Some(identity) = numbering.id(record.shape) {
                by_dim[record.dimension.index()].push((identity, id));
            }
        }

        let mut index = Self::default();
        for (dim, mut shapes) in Dimension::ALL.into_iter().zip(by_dim) {
            shapes.sort_by(|a, b| b.0.cmp(&a.0));
            for (generator_id, (_, record)) in (1u32..).zip(shapes) {
                index.by_generator.insert((dim, generator_id), record);
                index.by_record.insert(record, (dim, generator_id));
            }
        }

        debug!(
            vertices = index.count(Dimension::Vertex),
            edges = index.count(Dimension::Edge),
            faces = index.count(Dimension::Face),
            solids = index.count(Dimension::Solid),
            "built shape index"
        );
        index
    }

    /// Returns the record the mesher calls `generator_id` in `dim`.
    #[must_use]
    pub fn record(&self, dim: Dimension, generator_id: u32) -> Option<RecordId> {
        self.by_generator.get(&(dim, generator_id)).copied()
    }

    /// Returns the dimension and generator id of a record.
    #[must_use]
    pub fn generator_id(&self, record: RecordId) -> Option<(Dimension, u32)> {
        self.by_record.get(&record).copied()
    }

    /// Iterates over `(generator_id, record)` of one dimension in ascending
    /// generator id order.
    pub fn iter_dim(&self, dim: Dimension) -> impl Iterator<Item = (u32, RecordId)> + '_ {
        self.by_generator
            .range((dim, 1)..=(dim, u32::MAX))
            .map(|(&(_, generator_id), &record)| (generator_id, record))
    }

    /// Number of indexed shapes of one dimension.
    #[must_use]
    pub fn count(&self, dim: Dimension) -> usize {
        self.iter_dim(dim).count()
    }

    /// Total number of indexed shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_generator.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_generator.is_empty()
    }
}
