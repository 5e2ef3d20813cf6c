use std::collections::BTreeMap;

use tracing::info;

use crate::error::{MeshError, Result};
use crate::msh::{GmshMesh, MeshElement, PhysicalGroup, PhysicalTable};
use crate::region::RegionTable;
use crate::shape_graph::ShapeGraph;
use crate::shape_index::ShapeIndex;
use crate::topology::Dimension;

/// Physical ids are region ids shifted by this offset.
pub const PHYSICAL_ID_OFFSET: u32 = 10000;

/// Returns the dimension of an MSH element type, or `None` for types that
/// are not generated for planar fracture networks.
#[must_use]
pub fn element_dimension(el_type: u32) -> Option<Dimension> {
    match el_type {
        15 => Some(Dimension::Vertex),
        1 => Some(Dimension::Edge),
        2 => Some(Dimension::Face),
        4 => Some(Dimension::Solid),
        _ => None,
    }
}

/// Elements retained after tagging, with the physical group table.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedElements {
    pub elements: BTreeMap<u32, MeshElement>,
    pub physical: PhysicalTable,
    /// Number of elements dropped because their shape is structural or
    /// their region is inactive.
    pub dropped: usize,
}

impl TaggedElements {
    /// Replaces the elements and physical groups of `mesh`.
    pub fn apply_to(self, mesh: &mut GmshMesh) {
        mesh.elements = self.elements;
        mesh.physical = self.physical;
    }
}

/// Assigns every generated element to the physical group of the region
/// owning its geometric entity.
pub struct TagRegions<'a> {
    graph: &'a ShapeGraph,
    index: &'a ShapeIndex,
    regions: &'a RegionTable,
    physical_id_offset: u32,
}

impl<'a> TagRegions<'a> {
    /// Creates a new `TagRegions` operation.
    #[must_use]
    pub fn new(graph: &'a ShapeGraph, index: &'a ShapeIndex, regions: &'a RegionTable) -> Self {
        Self {
            graph,
            index,
            regions,
            physical_id_offset: PHYSICAL_ID_OFFSET,
        }
    }

    #[must_use]
    pub fn with_physical_id_offset(mut self, offset: u32) -> Self {
        self.physical_id_offset = offset;
        self
    }

    /// Executes the tagging. `mesh` is left untouched; apply the result
    /// with [`TaggedElements::apply_to`].
    ///
    /// # Errors
    ///
    /// Returns a [`MeshError`] for elements of unknown type, with fewer
    /// than two tags, on shapes missing from the index, or in a region of
    /// another dimension, when a physical group name is reused with a
    /// different id, and when a physical id does not fit in `u32`.
    pub fn execute(&self, mesh: &GmshMesh) -> Result<TaggedElements> {
        let mut physical = mesh.physical.clone();
        let mut elements = BTreeMap::new();
        let mut dropped = 0;

        for (&element, el) in &mesh.elements {
            let dim = element_dimension(el.el_type).ok_or(MeshError::UnknownElementType {
                element,
                el_type: el.el_type,
            })?;
            let [_, shape_id, ..] = el.tags[..] else {
                return Err(MeshError::MalformedElement {
                    element,
                    tags: el.tags.len(),
                }
                .into());
            };
            let record_id = self.index.record(dim, shape_id).ok_or(MeshError::UnknownShape {
                element,
                dim,
                shape_id,
            })?;

            let record = self.graph.record(record_id)?;
            if !record.is_free {
                dropped += 1;
                continue;
            }
            let region = self.regions.get(record.region_id)?;
            if !region.is_active(dim) {
                dropped += 1;
                continue;
            }
            if region.dim != dim {
                return Err(MeshError::DimensionMismatch {
                    region: region.name.clone(),
                    region_dim: region.dim,
                    element_dim: dim,
                }
                .into());
            }

            let physical_id = region
                .id
                .checked_add(self.physical_id_offset)
                .ok_or(MeshError::PhysicalIdOverflow {
                    region: region.id,
                    offset: self.physical_id_offset,
                })?;
            match physical.get(&region.name) {
                Some(group) if group.id != physical_id => {
                    return Err(MeshError::PhysicalGroupConflict {
                        name: region.name.clone(),
                        existing: group.id,
                        new: physical_id,
                    }
                    .into());
                }
                Some(_) => {}
                None => {
                    physical.insert(region.name.clone(), PhysicalGroup { id: physical_id, dim });
                }
            }

            let mut tagged = el.clone();
            tagged.tags[0] = physical_id;
            elements.insert(element, tagged);
        }

        info!(
            kept = elements.len(),
            dropped,
            groups = physical.len(),
            "tagged mesh elements"
        );
        Ok(TaggedElements {
            elements,
            physical,
            dropped,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::brep::WriteBrep;
    use crate::decomposition::Decomposition;
    use crate::error::FracmeshError;
    use crate::fixtures::{self, FACE_REGION, RIVER_REGION};
    use crate::operations::creation::{ImportDecomposition, ImportedShapes};
    use crate::region::Region;
    use crate::shape_graph::RecordId;

    struct Prepared {
        graph: ShapeGraph,
        imported: ImportedShapes,
        index: ShapeIndex,
    }

    fn prepare(decomp: &Decomposition, regions: &RegionTable) -> Prepared {
        let mut graph = ShapeGraph::new();
        let imported = ImportDecomposition::new(decomp, regions).execute(&mut graph).unwrap();
        let numbering = WriteBrep::new(&graph).execute(&mut std::io::sink()).unwrap();
        let index = ShapeIndex::build(&graph, &numbering);
        Prepared {
            graph,
            imported,
            index,
        }
    }

    fn generator_id(p: &Prepared, record: RecordId) -> u32 {
        p.index.generator_id(record).unwrap().1
    }

    fn element(el_type: u32, tags: Vec<u32>) -> MeshElement {
        MeshElement {
            el_type,
            tags,
            nodes: vec![1, 2, 3],
        }
    }

    /// Two triangles with the top side tagged as a river.
    fn river_case(regions: &RegionTable) -> Prepared {
        let mut decomp = fixtures::two_triangles();
        decomp.segments.get_mut(&2).unwrap().region = RIVER_REGION;
        prepare(&decomp, regions)
    }

    #[test]
    fn elements_are_assigned_to_region_groups() {
        let regions = fixtures::regions();
        let p = river_case(&regions);
        let face = generator_id(&p, p.imported.faces[&1]);
        let river = generator_id(&p, p.imported.edges[&2]);
        let diagonal = generator_id(&p, p.imported.edges[&4]);

        let mut mesh = GmshMesh::new();
        mesh.elements.insert(1, element(2, vec![0, face]));
        mesh.elements.insert(2, element(1, vec![0, river]));
        mesh.elements.insert(3, element(1, vec![0, diagonal]));

        let tagged = TagRegions::new(&p.graph, &p.index, &regions).execute(&mesh).unwrap();

        assert_eq!(tagged.elements[&1].tags, vec![FACE_REGION + 10000, face]);
        assert_eq!(tagged.elements[&2].tags, vec![RIVER_REGION + 10000, river]);
        assert!(!tagged.elements.contains_key(&3));
        assert_eq!(tagged.dropped, 1);
        assert_eq!(
            tagged.physical["river"],
            PhysicalGroup {
                id: 10002,
                dim: Dimension::Edge,
            }
        );
        assert_eq!(tagged.physical["rock"].dim, Dimension::Face);
    }

    #[test]
    fn single_tag_element_is_malformed() {
        let regions = fixtures::regions();
        let p = river_case(&regions);
        let mut mesh = GmshMesh::new();
        mesh.elements.insert(7, element(2, vec![0]));

        let err = TagRegions::new(&p.graph, &p.index, &regions)
            .execute(&mesh)
            .unwrap_err();
        assert!(matches!(
            err,
            FracmeshError::Mesh(MeshError::MalformedElement { element: 7, tags: 1 })
        ));
    }

    #[test]
    fn reused_group_name_with_another_id_conflicts() {
        let regions = fixtures::regions();
        let p = river_case(&regions);
        let river = generator_id(&p, p.imported.edges[&2]);
        let mut mesh = GmshMesh::new();
        mesh.physical.insert(
            "river".into(),
            PhysicalGroup {
                id: 42,
                dim: Dimension::Edge,
            },
        );
        mesh.elements.insert(1, element(1, vec![0, river]));

        let err = TagRegions::new(&p.graph, &p.index, &regions)
            .execute(&mesh)
            .unwrap_err();
        assert!(matches!(
            err,
            FracmeshError::Mesh(MeshError::PhysicalGroupConflict {
                existing: 42,
                new: 10002,
                ..
            })
        ));
    }

    #[test]
    fn regions_sharing_a_name_conflict() {
        let mut regions = fixtures::regions();
        regions
            .insert(Region::new(4, "river", Dimension::Edge, 0.5))
            .unwrap();
        let mut decomp = fixtures::two_triangles();
        decomp.segments.get_mut(&2).unwrap().region = RIVER_REGION;
        decomp.segments.get_mut(&1).unwrap().region = 4;
        let p = prepare(&decomp, &regions);
        let first = generator_id(&p, p.imported.edges[&2]);
        let second = generator_id(&p, p.imported.edges[&1]);

        let mut mesh = GmshMesh::new();
        mesh.elements.insert(1, element(1, vec![0, first]));
        mesh.elements.insert(2, element(1, vec![0, second]));

        let err = TagRegions::new(&p.graph, &p.index, &regions)
            .execute(&mesh)
            .unwrap_err();
        assert!(matches!(
            err,
            FracmeshError::Mesh(MeshError::PhysicalGroupConflict {
                existing: 10002,
                new: 10004,
                ..
            })
        ));
    }

    #[test]
    fn physical_id_overflow_is_an_error() {
        let big = u32::MAX - 5;
        let mut regions = fixtures::regions();
        regions
            .insert(Region::new(big, "fault", Dimension::Edge, 0.5))
            .unwrap();
        let mut decomp = fixtures::two_triangles();
        decomp.segments.get_mut(&2).unwrap().region = big;
        let p = prepare(&decomp, &regions);
        let fault = generator_id(&p, p.imported.edges[&2]);
        let mut mesh = GmshMesh::new();
        mesh.elements.insert(1, element(1, vec![0, fault]));

        let err = TagRegions::new(&p.graph, &p.index, &regions)
            .execute(&mesh)
            .unwrap_err();
        assert!(matches!(
            err,
            FracmeshError::Mesh(MeshError::PhysicalIdOverflow { region, offset: 10000 }) if region == big
        ));
    }

    #[test]
    fn inactive_regions_are_dropped() {
        let mut regions = RegionTable::new();
        regions
            .insert(Region::new(FACE_REGION, "rock", Dimension::Face, 1.0).with_inactive_dim(Dimension::Face))
            .unwrap();
        regions
            .insert(Region::new(RIVER_REGION, "river", Dimension::Edge, 0.5))
            .unwrap();
        let p = river_case(&regions);
        let face = generator_id(&p, p.imported.faces[&1]);
        let mut mesh = GmshMesh::new();
        mesh.elements.insert(1, element(2, vec![0, face]));

        let tagged = TagRegions::new(&p.graph, &p.index, &regions).execute(&mesh).unwrap();
        assert!(tagged.elements.is_empty());
        assert_eq!(tagged.dropped, 1);
        assert!(!tagged.physical.contains_key("rock"));
    }

    #[test]
    fn unknown_shape_and_type_are_rejected() {
        let regions = fixtures::regions();
        let p = river_case(&regions);
        let op = TagRegions::new(&p.graph, &p.index, &regions);

        let mut mesh = GmshMesh::new();
        mesh.elements.insert(1, element(2, vec![0, 99]));
        assert!(matches!(
            op.execute(&mesh).unwrap_err(),
            FracmeshError::Mesh(MeshError::UnknownShape { shape_id: 99, .. })
        ));

        mesh.elements.insert(1, element(9, vec![0, 1]));
        assert!(matches!(
            op.execute(&mesh).unwrap_err(),
            FracmeshError::Mesh(MeshError::UnknownElementType { el_type: 9, .. })
        ));
    }

    #[test]
    fn element_on_a_region_of_another_dimension_is_rejected() {
        // the polygon is tagged with the edge region
        let regions = fixtures::regions();
        let mut decomp = fixtures::two_triangles();
        decomp.polygons.get_mut(&1).unwrap().region = RIVER_REGION;
        let p = prepare(&decomp, &regions);
        let face = generator_id(&p, p.imported.faces[&1]);
        let mut mesh = GmshMesh::new();
        mesh.elements.insert(1, element(2, vec![0, face]));

        let err = TagRegions::new(&p.graph, &p.index, &regions)
            .execute(&mesh)
            .unwrap_err();
        assert!(matches!(
            err,
            FracmeshError::Mesh(MeshError::DimensionMismatch {
                region_dim: Dimension::Edge,
                element_dim: Dimension::Face,
                ..
            })
        ));
    }

    #[test]
    fn custom_offset_is_applied() {
        let regions = fixtures::regions();
        let p = river_case(&regions);
        let face = generator_id(&p, p.imported.faces[&1]);
        let mut mesh = GmshMesh::new();
        mesh.elements.insert(1, element(2, vec![0, face]));

        let tagged = TagRegions::new(&p.graph, &p.index, &regions)
            .with_physical_id_offset(500)
            .execute(&mesh)
            .unwrap();
        assert_eq!(tagged.elements[&1].tags[0], 501);
    }
}
