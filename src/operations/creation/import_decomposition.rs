use std::collections::BTreeMap;

use tracing::debug;

use crate::decomposition::{DecompWire, Decomposition, Side};
use crate::error::{ConfigError, Result, TopologyError};
use crate::geometry::curve::{Curve, Line, Line2d};
use crate::geometry::surface::{Plane, Surface};
use crate::math::Point2;
use crate::operations::creation::MakeWire;
use crate::region::{RegionId, RegionTable, UNASSIGNED};
use crate::shape_graph::{RecordId, ShapeGraph};
use crate::topology::{EdgeData, EdgeId, FaceData, OrientedEdge, VertexData, VertexId, WireId};

/// Records created by one [`ImportDecomposition`], keyed by the ids of
/// the decomposition.
#[derive(Debug, Clone, Default)]
pub struct ImportedShapes {
    pub vertices: BTreeMap<u32, RecordId>,
    pub edges: BTreeMap<u32, RecordId>,
    pub faces: BTreeMap<u32, RecordId>,
}

/// Converts a planar decomposition into vertices, edges and faces of a
/// [`ShapeGraph`].
///
/// Every point becomes a vertex at `z = 0`, every segment an edge and
/// every polygon except the outer one a face. Tagged entities become free
/// records owned by their region.
pub struct ImportDecomposition<'a> {
    decomposition: &'a Decomposition,
    regions: &'a RegionTable,
}

impl<'a> ImportDecomposition<'a> {
    /// Creates a new `ImportDecomposition` operation.
    #[must_use]
    pub fn new(decomposition: &'a Decomposition, regions: &'a RegionTable) -> Self {
        Self {
            decomposition,
            regions,
        }
    }

    /// Executes the import, appending records to `graph`.
    ///
    /// The first import also creates the plane shared by all faces.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if a segment refers to a
    /// missing point or a wire to a missing segment,
    /// [`TopologyError::WireNotClosed`] if a wire does not form a loop and
    /// [`ConfigError::UnknownRegion`] for a tag with no region.
    pub fn execute(&self, graph: &mut ShapeGraph) -> Result<ImportedShapes> {
        let decomp = self.decomposition;
        let mut imported = ImportedShapes::default();
        if decomp.points.is_empty() {
            return Ok(imported);
        }

        if graph.plane().is_none() {
            let xy: Vec<Point2> = decomp.points.values().map(|p| p.point()).collect();
            graph.set_plane(Plane::spanning_xy(&xy)?);
        }
        let plane = graph
            .plane()
            .cloned()
            .ok_or_else(|| TopologyError::InvalidTopology("missing supporting plane".into()))?;

        let mut vertex_ids: BTreeMap<u32, VertexId> = BTreeMap::new();
        for (&id, point) in &decomp.points {
            self.check_region(point.region)?;
            let vertex = graph.store_mut().add_vertex(VertexData::from_xy(point.point()));
            vertex_ids.insert(id, vertex);
            imported.vertices.insert(id, graph.add_record(vertex.into(), point.region)?);
        }

        let mut edge_ids: BTreeMap<u32, EdgeId> = BTreeMap::new();
        for (&id, segment) in &decomp.segments {
            self.check_region(segment.region)?;
            let [a, b] = segment.vtxs;
            let start = lookup(&vertex_ids, a, "point")?;
            let end = lookup(&vertex_ids, b, "point")?;
            let p0 = graph.store().vertex(start)?.point;
            let p1 = graph.store().vertex(end)?.point;
            let (curve, length) = Line::through(p0, p1)?;
            let pcurve = Line2d::between(plane.parameters_of(&p0), plane.parameters_of(&p1), length);
            let (t_start, t_end) = (curve.parameter_of(&p0), curve.parameter_of(&p1));
            let edge = graph.store_mut().add_edge(EdgeData {
                start,
                end,
                curve,
                pcurve: Some(pcurve),
                t_start,
                t_end,
            });
            edge_ids.insert(id, edge);
            imported.edges.insert(id, graph.add_record(edge.into(), segment.region)?);
        }

        for (&id, polygon) in &decomp.polygons {
            if polygon.is_outer {
                continue;
            }
            self.check_region(polygon.region)?;
            let outer_wire = make_wire(graph, &edge_ids, &polygon.outer_wire)?;
            let holes = polygon
                .holes
                .iter()
                .map(|hole| make_wire(graph, &edge_ids, hole))
                .collect::<Result<Vec<_>>>()?;
            let face = graph
                .store_mut()
                .add_face(FaceData::new(plane.clone(), outer_wire).with_holes(holes));
            imported.faces.insert(id, graph.add_record(face.into(), polygon.region)?);
        }

        debug!(
            vertices = imported.vertices.len(),
            edges = imported.edges.len(),
            faces = imported.faces.len(),
            "imported decomposition"
        );
        Ok(imported)
    }

    fn check_region(&self, region: RegionId) -> Result<()> {
        if region != UNASSIGNED && !self.regions.contains(region) {
            return Err(ConfigError::UnknownRegion(region).into());
        }
        Ok(())
    }
}

/// Builds the wire of a decomposition loop. Segments run on their right
/// side are traversed against their direction.
fn make_wire(graph: &mut ShapeGraph, edge_ids: &BTreeMap<u32, EdgeId>, wire: &DecompWire) -> Result<WireId> {
    let edges = wire
        .segments
        .iter()
        .map(|ws| {
            let edge = lookup(edge_ids, ws.segment, "segment")?;
            Ok(OrientedEdge::new(edge, ws.side == Side::Left))
        })
        .collect::<Result<Vec<_>>>()?;
    MakeWire::new(edges).execute(graph.store_mut())
}

fn lookup<K: Copy>(ids: &BTreeMap<u32, K>, id: u32, kind: &str) -> Result<K> {
    ids.get(&id)
        .copied()
        .ok_or_else(|| TopologyError::EntityNotFound(format!("{kind} {id}")).into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::FracmeshError;
    use crate::fixtures::{self, FACE_REGION};
    use crate::region::Region;
    use crate::topology::{Dimension, Shape};

    fn import(decomp: &Decomposition, regions: &RegionTable) -> (ShapeGraph, Result<ImportedShapes>) {
        let mut graph = ShapeGraph::new();
        let result = ImportDecomposition::new(decomp, regions).execute(&mut graph);
        (graph, result)
    }

    #[test]
    fn two_triangles_produce_all_records() {
        let (graph, imported) = import(&fixtures::two_triangles(), &fixtures::regions());
        let imported = imported.unwrap();

        assert_eq!(imported.vertices.len(), 4);
        assert_eq!(imported.edges.len(), 5);
        // outer polygon is skipped
        assert_eq!(imported.faces.len(), 2);
        assert_eq!(graph.len(), 11);

        let face = graph.record(imported.faces[&1]).unwrap();
        assert_eq!(face.dimension, Dimension::Face);
        assert_eq!(face.region_id, FACE_REGION);
        assert!(face.is_free);
        assert!(!graph.record(imported.vertices[&0]).unwrap().is_free);
    }

    #[test]
    fn right_side_segments_are_reversed() {
        let (graph, imported) = import(&fixtures::two_triangles(), &fixtures::regions());
        let imported = imported.unwrap();
        let Shape::Face(face) = graph.record(imported.faces[&1]).unwrap().shape else {
            panic!("expected a face");
        };
        let wire = graph.store().face(face).unwrap().outer_wire;
        let forward: Vec<bool> = graph
            .store()
            .wire(wire)
            .unwrap()
            .edges
            .iter()
            .map(|oe| oe.forward)
            .collect();
        assert_eq!(forward, vec![true, true, false]);
    }

    #[test]
    fn edges_carry_curves_on_the_plane() {
        let (graph, imported) = import(&fixtures::two_triangles(), &fixtures::regions());
        let imported = imported.unwrap();
        // the diagonal from (0, 0) to (2, 2)
        let Shape::Edge(diag) = graph.record(imported.edges[&4]).unwrap().shape else {
            panic!("expected an edge");
        };
        let edge = graph.store().edge(diag).unwrap();
        approx::assert_relative_eq!(edge.t_end, 8.0_f64.sqrt());
        let end_uv = edge.pcurve.as_ref().unwrap().point_at(edge.t_end);
        approx::assert_relative_eq!(end_uv.x, 2.0, epsilon = 1e-12);
        approx::assert_relative_eq!(end_uv.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn holes_are_attached_to_the_face() {
        let (graph, imported) = import(&fixtures::square_with_hole(), &fixtures::regions());
        let imported = imported.unwrap();
        let Shape::Face(face) = graph.record(imported.faces[&1]).unwrap().shape else {
            panic!("expected a face");
        };
        assert_eq!(graph.store().face(face).unwrap().holes.len(), 1);
        assert_eq!(graph.store().subshapes(Shape::Face(face)).unwrap().len(), 2);
    }

    #[test]
    fn missing_segment_is_a_lookup_error() {
        let mut decomp = fixtures::two_triangles();
        decomp.polygons.get_mut(&1).unwrap().outer_wire.segments[0].segment = 99;
        let (_, result) = import(&decomp, &fixtures::regions());
        assert!(matches!(
            result,
            Err(FracmeshError::Topology(TopologyError::EntityNotFound(ref what))) if what == "segment 99"
        ));
    }

    #[test]
    fn missing_point_is_a_lookup_error() {
        let mut decomp = fixtures::two_triangles();
        decomp.add_segment(0, 42);
        let (_, result) = import(&decomp, &fixtures::regions());
        assert!(matches!(
            result,
            Err(FracmeshError::Topology(TopologyError::EntityNotFound(ref what))) if what == "point 42"
        ));
    }

    #[test]
    fn wrong_side_breaks_the_loop() {
        let mut decomp = fixtures::two_triangles();
        decomp.polygons.get_mut(&1).unwrap().outer_wire.segments[2].side = Side::Left;
        let (_, result) = import(&decomp, &fixtures::regions());
        assert!(matches!(
            result,
            Err(FracmeshError::Topology(TopologyError::WireNotClosed))
        ));
    }

    #[test]
    fn unknown_region_is_rejected() {
        let mut decomp = fixtures::two_triangles();
        decomp.add_tagged_point(5.0, 5.0, 77);
        let (_, result) = import(&decomp, &fixtures::regions());
        assert!(matches!(
            result,
            Err(FracmeshError::Config(ConfigError::UnknownRegion(77)))
        ));
    }

    #[test]
    fn later_imports_reuse_the_plane() {
        let mut regions = fixtures::regions();
        regions.insert(Region::new(9, "extra", Dimension::Vertex, 1.0)).unwrap();
        let mut graph = ShapeGraph::new();
        ImportDecomposition::new(&fixtures::two_triangles(), &regions)
            .execute(&mut graph)
            .unwrap();
        let origin = *graph.plane().unwrap().origin();

        let mut far = Decomposition::new();
        far.add_tagged_point(-10.0, -10.0, 9);
        let imported = ImportDecomposition::new(&far, &regions).execute(&mut graph).unwrap();

        assert_eq!(imported.vertices.len(), 1);
        assert_eq!(*graph.plane().unwrap().origin(), origin);
        assert_eq!(graph.len(), 12);
    }
}
