use std::collections::HashMap;
use std::io::Write;

use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::geometry::surface::Plane;
use crate::shape_graph::ShapeGraph;
use crate::topology::{EdgeId, Shape, TopologyStore};

use super::numbering::{BrepShape, ShapeNumbering};

const TOLERANCE: &str = "1e-07";

/// Writes the compound of all free shapes of a graph in the OpenCASCADE
/// BREP text format.
///
/// Free shapes enter the compound highest dimension first. Every shape
/// reachable from the compound is written once, after its sub-shapes; the
/// resulting [`ShapeNumbering`] is what the external mesher enumerates.
pub struct WriteBrep<'a> {
    graph: &'a ShapeGraph,
}

/// Indices of the geometry attached to edges, 1-based within their
/// section of the file. The single surface is the plane of the graph; all
/// faces lie on it and it carries the parameter curves of all edges.
#[derive(Default)]
struct GeometryTables {
    curves: Vec<EdgeId>,
    curve2ds: Vec<EdgeId>,
    plane: Option<Plane>,
    curve_of: HashMap<EdgeId, usize>,
    curve2d_of: HashMap<EdgeId, usize>,
}

impl GeometryTables {
    /// Index of the plane in the `Surfaces` section, `0` if none is written.
    fn surface(&self) -> usize {
        usize::from(self.plane.is_some())
    }
}

impl<'a> WriteBrep<'a> {
    /// Creates a new `WriteBrep` operation.
    #[must_use]
    pub fn new(graph: &'a ShapeGraph) -> Self {
        Self { graph }
    }

    /// Executes the operation, writing the file to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if a shape refers to a missing entity or writing
    /// fails.
    pub fn execute<W: Write>(&self, out: &mut W) -> Result<ShapeNumbering> {
        let store = self.graph.store();
        let mut roots = Vec::new();
        for id in self.graph.free_records() {
            roots.push(self.graph.record(id)?.shape);
        }

        let mut numbering = ShapeNumbering::default();
        for &root in &roots {
            number(store, root, &mut numbering)?;
        }
        numbering.assign(BrepShape::Compound);

        let tables = collect_geometry(store, self.graph.plane(), &numbering)?;
        write_header(out)?;
        write_geometry(out, store, &tables)?;
        write_tshapes(out, store, &numbering, &tables, &roots)?;

        debug!(shapes = numbering.len(), free = roots.len(), "wrote BREP geometry");
        Ok(numbering)
    }
}

/// Numbers `shape` and everything below it in depth-first post-order.
fn number(store: &TopologyStore, shape: Shape, numbering: &mut ShapeNumbering) -> Result<()> {
    if numbering.id(shape).is_some() {
        return Ok(());
    }
    for sub in store.subshapes(shape)? {
        number(store, sub, numbering)?;
    }
    numbering.assign(BrepShape::Shape(shape));
    Ok(())
}

fn collect_geometry(
    store: &TopologyStore,
    plane: Option<&Plane>,
    numbering: &ShapeNumbering,
) -> Result<GeometryTables> {
    let mut tables = GeometryTables {
        plane: plane.cloned(),
        ..GeometryTables::default()
    };
    for (_, shape) in numbering.iter() {
        match shape {
            BrepShape::Shape(Shape::Edge(id)) => {
                tables.curves.push(id);
                tables.curve_of.insert(id, tables.curves.len());
                if plane.is_some() && store.edge(id)?.pcurve.is_some() {
                    tables.curve2ds.push(id);
                    tables.curve2d_of.insert(id, tables.curve2ds.len());
                }
            }
            // faces assembled by hand on a graph without a plane
            BrepShape::Shape(Shape::Face(id)) if tables.plane.is_none() => {
                tables.plane = Some(store.face(id)?.plane.clone());
            }
            _ => {}
        }
    }
    Ok(tables)
}

fn write_header<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "DBRep_DrawableShape")?;
    writeln!(out)?;
    writeln!(out, "CASCADE Topology V1, (c) Matra-Datavision")?;
    writeln!(out, "Locations 0")?;
    Ok(())
}

fn write_geometry<W: Write>(out: &mut W, store: &TopologyStore, tables: &GeometryTables) -> Result<()> {
    writeln!(out, "Curve2ds {}", tables.curve2ds.len())?;
    for &id in &tables.curve2ds {
        let edge = store.edge(id)?;
        let Some(pcurve) = edge.pcurve.as_ref() else {
            continue;
        };
        let (o, d) = (pcurve.origin(), pcurve.direction());
        writeln!(out, "1 {} {} {} {}", o.x, o.y, d.x, d.y)?;
    }

    writeln!(out, "Curves {}", tables.curves.len())?;
    for &id in &tables.curves {
        let curve = &store.edge(id)?.curve;
        let (o, d) = (curve.origin(), curve.direction());
        writeln!(out, "1 {} {} {} {} {} {}", o.x, o.y, o.z, d.x, d.y, d.z)?;
    }

    writeln!(out, "Polygon3D 0")?;
    writeln!(out, "PolygonOnTriangulations 0")?;

    writeln!(out, "Surfaces {}", tables.surface())?;
    if let Some(plane) = &tables.plane {
        let (o, n, u, v) = (plane.origin(), plane.normal(), plane.u_dir(), plane.v_dir());
        writeln!(
            out,
            "1 {} {} {} {} {} {} {} {} {} {} {} {}",
            o.x, o.y, o.z, n.x, n.y, n.z, u.x, u.y, u.z, v.x, v.y, v.z
        )?;
    }

    writeln!(out, "Triangulations 0")?;
    writeln!(out)?;
    Ok(())
}

fn write_tshapes<W: Write>(
    out: &mut W,
    store: &TopologyStore,
    numbering: &ShapeNumbering,
    tables: &GeometryTables,
    roots: &[Shape],
) -> Result<()> {
    let reference = |shape: BrepShape| {
        numbering
            .file_ref(shape)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("unnumbered {shape:?}")))
    };
    let sub_ref = |shape: Shape, forward: bool| -> Result<String> {
        let sign = if forward { '+' } else { '-' };
        Ok(format!("{sign}{} 0", reference(BrepShape::Shape(shape))?))
    };

    writeln!(out, "TShapes {}", numbering.len())?;
    for (_, shape) in numbering.iter() {
        let mut refs = Vec::new();
        match shape {
            BrepShape::Shape(Shape::Vertex(id)) => {
                let p = store.vertex(id)?.point;
                writeln!(out, "Ve")?;
                writeln!(out, "{TOLERANCE}")?;
                writeln!(out, "{} {} {}", p.x, p.y, p.z)?;
                writeln!(out, "0 0")?;
                writeln!(out)?;
                writeln!(out, "0101101")?;
            }
            BrepShape::Shape(Shape::Edge(id)) => {
                let edge = store.edge(id)?;
                writeln!(out, "Ed")?;
                writeln!(out, " {TOLERANCE} 1 1 0")?;
                if let Some(&curve) = tables.curve_of.get(&id) {
                    writeln!(out, "1  {curve} 0 {} {}", edge.t_start, edge.t_end)?;
                }
                if let Some(&c2d) = tables.curve2d_of.get(&id) {
                    let surface = tables.surface();
                    writeln!(out, "2  {c2d} {surface} 0 {} {}", edge.t_start, edge.t_end)?;
                }
                writeln!(out, "0")?;
                writeln!(out)?;
                writeln!(out, "0101000")?;
                refs.push(sub_ref(edge.start.into(), true)?);
                refs.push(sub_ref(edge.end.into(), false)?);
            }
            BrepShape::Shape(Shape::Wire(id)) => {
                let wire = store.wire(id)?;
                writeln!(out, "Wi")?;
                writeln!(out)?;
                writeln!(out, "0101100")?;
                for oe in &wire.edges {
                    refs.push(sub_ref(oe.edge.into(), oe.forward)?);
                }
            }
            BrepShape::Shape(Shape::Face(id)) => {
                let face = store.face(id)?;
                writeln!(out, "Fa")?;
                writeln!(out, "0  {TOLERANCE} {} 0", tables.surface())?;
                writeln!(out)?;
                writeln!(out, "0111000")?;
                // hole wires are already clockwise
                for wire in face.wires() {
                    refs.push(sub_ref(wire.into(), true)?);
                }
            }
            BrepShape::Shape(Shape::Shell(id)) => {
                writeln!(out, "Sh")?;
                writeln!(out)?;
                writeln!(out, "0101100")?;
                for &face in &store.shell(id)?.faces {
                    refs.push(sub_ref(face.into(), true)?);
                }
            }
            BrepShape::Shape(Shape::Solid(id)) => {
                let solid = store.solid(id)?;
                writeln!(out, "So")?;
                writeln!(out)?;
                writeln!(out, "0101000")?;
                for (i, &shell) in solid.shells.iter().enumerate() {
                    refs.push(sub_ref(shell.into(), i == 0)?);
                }
            }
            BrepShape::Compound => {
                writeln!(out, "Co")?;
                writeln!(out)?;
                writeln!(out, "1101000")?;
                for &root in roots {
                    refs.push(sub_ref(root, true)?);
                }
            }
        }
        refs.push("*".to_string());
        writeln!(out, "{}", refs.join(" "))?;
    }

    writeln!(out)?;
    writeln!(out, "+{} 0", reference(BrepShape::Compound)?)?;
    Ok(())
}
