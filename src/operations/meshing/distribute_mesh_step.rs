use tracing::{debug, info};

use crate::error::{OperationError, Result};
use crate::region::RegionTable;
use crate::shape_graph::ShapeGraph;
use crate::shape_index::ShapeIndex;
use crate::topology::{Dimension, Shape};

/// Mesh steps resolved for the vertices seen by the mesher.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshStepDistribution {
    /// Step used where no region requests one.
    pub global_step: f64,
    /// Smallest step requested by a free shape.
    pub min_step: f64,
    /// Largest step requested by a free shape.
    pub max_step: f64,
    /// `(generator_id, mesh_step)` of every indexed vertex, ascending ids.
    pub vertex_steps: Vec<(u32, f64)>,
}

/// Pushes the mesh step of every free shape down to its vertices.
///
/// Free shapes are processed highest dimension first. From each one a
/// depth-first traversal reaches all of its sub-shapes, and every vertex
/// keeps the smallest step of all free shapes reaching it. Regions without
/// a positive step use `global_step`, and so do vertices reached by no
/// free shape.
pub struct DistributeMeshStep<'a> {
    regions: &'a RegionTable,
    index: &'a ShapeIndex,
    global_step: f64,
}

impl<'a> DistributeMeshStep<'a> {
    /// Creates a new `DistributeMeshStep` operation.
    #[must_use]
    pub fn new(regions: &'a RegionTable, index: &'a ShapeIndex, global_step: f64) -> Self {
        Self {
            regions,
            index,
            global_step,
        }
    }

    /// Executes the propagation, updating the records of `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if the global step is
    /// needed but is not a positive finite number, and an error if a free
    /// shape refers to an unknown region or a missing entity.
    pub fn execute(&self, graph: &mut ShapeGraph) -> Result<MeshStepDistribution> {
        graph.reset_propagation();
        let free = graph.free_records();
        let mut min_step = f64::INFINITY;
        let mut max_step: f64 = 0.0;

        for (pass, &root_id) in free.iter().enumerate() {
            let root = graph.record(root_id)?;
            let region = self.regions.get(root.region_id)?;
            let step = if region.mesh_step > 0.0 {
                region.mesh_step
            } else {
                self.fallback_step()?
            };
            min_step = min_step.min(step);
            max_step = max_step.max(step);

            let root_shape = root.shape;
            {
                let root = graph.record_mut(root_id)?;
                root.mesh_step = root.mesh_step.min(step);
                root.visit_generation = Some(pass);
            }

            let mut stack = vec![root_shape];
            while let Some(shape) = stack.pop() {
                for sub in graph.store().subshapes(shape)? {
                    let Some(sub_id) = graph.record_of(sub) else {
                        // wires and shells
                        stack.push(sub);
                        continue;
                    };
                    let record = graph.record_mut(sub_id)?;
                    if record.visit_generation.is_some_and(|g| g >= pass) {
                        continue;
                    }
                    record.visit_generation = Some(pass);
                    stack.push(sub);
                }
                if let (Shape::Vertex(_), Some(id)) = (shape, graph.record_of(shape)) {
                    let vertex = graph.record_mut(id)?;
                    vertex.mesh_step = vertex.mesh_step.min(step);
                }
            }
            debug!(pass, region = %region.name, step, "propagated mesh step");
        }

        if free.is_empty() {
            min_step = self.global_step;
            max_step = self.global_step;
        }

        let unreached: Vec<_> = graph
            .records()
            .filter(|(_, r)| r.dimension == Dimension::Vertex && r.mesh_step.is_infinite())
            .map(|(id, _)| id)
            .collect();
        if !unreached.is_empty() {
            let step = self.fallback_step()?;
            for &id in &unreached {
                graph.record_mut(id)?.mesh_step = step;
            }
        }

        let mut vertex_steps = Vec::with_capacity(self.index.count(Dimension::Vertex));
        for (generator_id, id) in self.index.iter_dim(Dimension::Vertex) {
            vertex_steps.push((generator_id, graph.record(id)?.mesh_step));
        }

        info!(
            global_step = self.global_step,
            min_step,
            max_step,
            free = free.len(),
            unreached = unreached.len(),
            "distributed mesh step"
        );
        Ok(MeshStepDistribution {
            global_step: self.global_step,
            min_step,
            max_step,
            vertex_steps,
        })
    }

    /// The global step, checked where it replaces a missing region step.
    fn fallback_step(&self) -> Result<f64> {
        if self.global_step.is_finite() && self.global_step > 0.0 {
            Ok(self.global_step)
        } else {
            Err(OperationError::InvalidInput(format!(
                "global mesh step must be positive, got {}",
                self.global_step
            ))
            .into())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::brep::WriteBrep;
    use crate::decomposition::{DecompWire, Decomposition, Side};
    use crate::fixtures::{self, RIVER_REGION};
    use crate::operations::creation::{ImportDecomposition, ImportedShapes};
    use crate::operations::query::BoundingBox;
    use crate::region::Region;
    use crate::topology::{ShellData, SolidData};
    use approx::assert_relative_eq;

    struct Prepared {
        graph: ShapeGraph,
        imported: ImportedShapes,
        index: ShapeIndex,
        global_step: f64,
    }

    fn prepare(decomp: &Decomposition, regions: &RegionTable) -> Prepared {
        let mut graph = ShapeGraph::new();
        let imported = ImportDecomposition::new(decomp, regions).execute(&mut graph).unwrap();
        let numbering = WriteBrep::new(&graph).execute(&mut std::io::sink()).unwrap();
        let index = ShapeIndex::build(&graph, &numbering);
        let global_step = BoundingBox::new().execute(&graph).unwrap().mesh_step_estimate(20.0);
        Prepared {
            graph,
            imported,
            index,
            global_step,
        }
    }

    fn vertex_step(p: &Prepared, point: u32) -> f64 {
        p.graph.record(p.imported.vertices[&point]).unwrap().mesh_step
    }

    #[test]
    fn smaller_edge_step_wins_on_shared_vertices() {
        // face {0, 1, 2} at 1.0, edge {2, 3} at 0.5
        let mut decomp = fixtures::two_triangles();
        decomp.segments.get_mut(&2).unwrap().region = RIVER_REGION;
        let regions = fixtures::regions();
        let mut p = prepare(&decomp, &regions);

        let dist = DistributeMeshStep::new(&regions, &p.index, p.global_step)
            .execute(&mut p.graph)
            .unwrap();

        assert_relative_eq!(vertex_step(&p, 0), 1.0);
        assert_relative_eq!(vertex_step(&p, 1), 1.0);
        assert_relative_eq!(vertex_step(&p, 2), 0.5);
        assert_relative_eq!(vertex_step(&p, 3), 0.5);
        assert_relative_eq!(dist.min_step, 0.5);
        assert_relative_eq!(dist.max_step, 1.0);
        assert_eq!(dist.vertex_steps.len(), 4);
    }

    #[test]
    fn unreached_vertices_get_the_global_step() {
        let regions = fixtures::regions();
        let mut p = prepare(&fixtures::two_triangles(), &regions);
        assert_relative_eq!(p.global_step, 0.1);

        DistributeMeshStep::new(&regions, &p.index, p.global_step)
            .execute(&mut p.graph)
            .unwrap();

        assert_relative_eq!(vertex_step(&p, 3), 0.1);
        assert_relative_eq!(vertex_step(&p, 0), 1.0);
    }

    #[test]
    fn non_positive_region_step_falls_back_to_global() {
        let mut regions = RegionTable::new();
        regions
            .insert(Region::new(4, "aquifer", Dimension::Face, -1.0))
            .unwrap();
        let mut decomp = Decomposition::new();
        let a = decomp.add_point(0.0, 0.0);
        let b = decomp.add_point(100.0, 0.0);
        let c = decomp.add_point(50.0, 20.0);
        let ab = decomp.add_segment(a, b);
        let bc = decomp.add_segment(b, c);
        let ca = decomp.add_segment(c, a);
        decomp.add_polygon(
            DecompWire::new([(ab, Side::Left), (bc, Side::Left), (ca, Side::Left)]),
            vec![],
            4,
        );
        let mut p = prepare(&decomp, &regions);

        let dist = DistributeMeshStep::new(&regions, &p.index, p.global_step)
            .execute(&mut p.graph)
            .unwrap();

        assert_relative_eq!(dist.global_step, 5.0);
        assert_relative_eq!(dist.min_step, 5.0);
        assert_relative_eq!(dist.max_step, 5.0);
        for (_, step) in &dist.vertex_steps {
            assert_relative_eq!(*step, 5.0);
        }
        assert_eq!(dist.vertex_steps.len(), 3);
    }

    #[test]
    fn reached_vertices_never_exceed_the_root_step() {
        let mut decomp = fixtures::square_with_hole();
        decomp.segments.get_mut(&5).unwrap().region = RIVER_REGION;
        let regions = fixtures::regions();
        let mut p = prepare(&decomp, &regions);

        DistributeMeshStep::new(&regions, &p.index, p.global_step)
            .execute(&mut p.graph)
            .unwrap();

        // the frame reaches all 8 points at 1.0; segment 5 joins points 5 and 6
        for point in 0..8 {
            let step = vertex_step(&p, point);
            let bound = if point == 5 || point == 6 { 0.5 } else { 1.0 };
            assert!(step <= bound, "point {point}: {step} > {bound}");
        }
        assert_relative_eq!(vertex_step(&p, 5), 0.5);
        assert_relative_eq!(vertex_step(&p, 4), 1.0);
    }

    #[test]
    fn minimum_holds_whatever_root_is_processed_first() {
        // the solid is seeded first but its step is larger than the face's
        let mut regions = fixtures::regions();
        regions
            .insert(Region::new(5, "block", Dimension::Solid, 2.0))
            .unwrap();
        let mut p = prepare(&fixtures::two_triangles(), &regions);

        let face_a = p.graph.record(p.imported.faces[&1]).unwrap().shape;
        let face_b = p.graph.record(p.imported.faces[&2]).unwrap().shape;
        let (Shape::Face(fa), Shape::Face(fb)) = (face_a, face_b) else {
            panic!("expected faces");
        };
        let shell = p.graph.store_mut().add_shell(ShellData::new(vec![fa, fb]));
        let solid = p.graph.store_mut().add_solid(SolidData::bounded_by(shell));
        p.graph.add_record(solid.into(), 5).unwrap();
        assert_eq!(
            p.graph.record(p.graph.free_records()[0]).unwrap().dimension,
            Dimension::Solid
        );

        let dist = DistributeMeshStep::new(&regions, &p.index, p.global_step)
            .execute(&mut p.graph)
            .unwrap();

        assert_relative_eq!(vertex_step(&p, 0), 1.0);
        assert_relative_eq!(vertex_step(&p, 2), 1.0);
        assert_relative_eq!(vertex_step(&p, 3), 2.0);
        assert_relative_eq!(dist.max_step, 2.0);
    }

    #[test]
    fn propagation_is_idempotent() {
        let mut decomp = fixtures::two_triangles();
        decomp.segments.get_mut(&2).unwrap().region = RIVER_REGION;
        let regions = fixtures::regions();
        let mut p = prepare(&decomp, &regions);
        let op = DistributeMeshStep::new(&regions, &p.index, p.global_step);

        let first = op.execute(&mut p.graph).unwrap();
        let steps: Vec<f64> = p.graph.records().map(|(_, r)| r.mesh_step).collect();
        let second = op.execute(&mut p.graph).unwrap();
        let again: Vec<f64> = p.graph.records().map(|(_, r)| r.mesh_step).collect();

        assert_eq!(first, second);
        assert_eq!(steps, again);
    }

    #[test]
    fn without_free_shapes_every_step_is_global() {
        let regions = fixtures::regions();
        let mut decomp = fixtures::two_triangles();
        decomp.polygons.get_mut(&1).unwrap().region = 0;
        let mut p = prepare(&decomp, &regions);

        let dist = DistributeMeshStep::new(&regions, &p.index, p.global_step)
            .execute(&mut p.graph)
            .unwrap();

        assert_relative_eq!(dist.min_step, p.global_step);
        assert_relative_eq!(dist.max_step, p.global_step);
        assert!(dist.vertex_steps.is_empty());
        for point in 0..4 {
            assert_relative_eq!(vertex_step(&p, point), p.global_step);
        }
    }

    #[test]
    fn invalid_global_step_is_rejected_when_needed() {
        // point 3 is reached by no free shape
        let regions = fixtures::regions();
        let mut p = prepare(&fixtures::two_triangles(), &regions);
        assert!(DistributeMeshStep::new(&regions, &p.index, 0.0)
            .execute(&mut p.graph)
            .is_err());
        assert!(DistributeMeshStep::new(&regions, &p.index, f64::NAN)
            .execute(&mut p.graph)
            .is_err());
    }

    #[test]
    fn explicit_steps_do_not_need_the_global_step() {
        let mut regions = RegionTable::new();
        regions
            .insert(Region::new(7, "well", Dimension::Vertex, 1.0))
            .unwrap();
        let mut decomp = Decomposition::new();
        decomp.add_tagged_point(3.0, 4.0, 7);
        let mut p = prepare(&decomp, &regions);
        assert_relative_eq!(p.global_step, 0.0);

        let dist = DistributeMeshStep::new(&regions, &p.index, p.global_step)
            .execute(&mut p.graph)
            .unwrap();

        assert_eq!(dist.vertex_steps, vec![(1, 1.0)]);
        assert_relative_eq!(dist.min_step, 1.0);
        assert_relative_eq!(vertex_step(&p, 0), 1.0);
    }
}
