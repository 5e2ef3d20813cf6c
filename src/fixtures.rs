//! Small decompositions shared by unit tests.

use crate::decomposition::{DecompWire, Decomposition, Side};
use crate::region::{Region, RegionId, RegionTable};
use crate::topology::Dimension;

pub const FACE_REGION: RegionId = 1;
pub const RIVER_REGION: RegionId = 2;
pub const WELL_REGION: RegionId = 3;

/// `rock` (face, step 1.0), `river` (edge, step 0.5) and `well`
/// (vertex, no explicit step).
#[allow(clippy::unwrap_used)]
pub fn regions() -> RegionTable {
    let mut table = RegionTable::new();
    table.insert(Region::new(FACE_REGION, "rock", Dimension::Face, 1.0)).unwrap();
    table.insert(Region::new(RIVER_REGION, "river", Dimension::Edge, 0.5)).unwrap();
    table.insert(Region::new(WELL_REGION, "well", Dimension::Vertex, -1.0)).unwrap();
    table
}

/// The square `[0, 2]²` cut by its diagonal from point 0 to point 2.
///
/// Points 0..4 run counter-clockwise from the origin, segments 0..4 are
/// the sides (segment `i` from point `i` to `i + 1`) and segment 4 is the
/// diagonal. Polygon 0 is the outer polygon, polygon 1 the lower-right
/// triangle (tagged [`FACE_REGION`]) and polygon 2 the upper-left one.
pub fn two_triangles() -> Decomposition {
    let mut d = Decomposition::new();
    let p: Vec<u32> = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]
        .iter()
        .map(|&(x, y)| d.add_point(x, y))
        .collect();
    let s: Vec<u32> = (0..4).map(|i| d.add_segment(p[i], p[(i + 1) % 4])).collect();
    let diag = d.add_segment(p[0], p[2]);

    d.add_outer_polygon(vec![DecompWire::new([
        (s[3], Side::Right),
        (s[2], Side::Right),
        (s[1], Side::Right),
        (s[0], Side::Right),
    ])]);
    d.add_polygon(
        DecompWire::new([(s[0], Side::Left), (s[1], Side::Left), (diag, Side::Right)]),
        vec![],
        FACE_REGION,
    );
    d.add_polygon(
        DecompWire::new([(diag, Side::Left), (s[2], Side::Left), (s[3], Side::Left)]),
        vec![],
        0,
    );
    d
}

/// The square `[0, 4]²` with the square hole `[1, 3]²`.
///
/// Polygon 1 is the tagged frame, polygon 2 fills the hole.
pub fn square_with_hole() -> Decomposition {
    let mut d = Decomposition::new();
    let outer: Vec<u32> = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]
        .iter()
        .map(|&(x, y)| d.add_point(x, y))
        .collect();
    let inner: Vec<u32> = [(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)]
        .iter()
        .map(|&(x, y)| d.add_point(x, y))
        .collect();
    let so: Vec<u32> = (0..4).map(|i| d.add_segment(outer[i], outer[(i + 1) % 4])).collect();
    let si: Vec<u32> = (0..4).map(|i| d.add_segment(inner[i], inner[(i + 1) % 4])).collect();

    d.add_outer_polygon(vec![DecompWire::new(so.iter().rev().map(|&s| (s, Side::Right)))]);
    d.add_polygon(
        DecompWire::new(so.iter().map(|&s| (s, Side::Left))),
        vec![DecompWire::new(si.iter().rev().map(|&s| (s, Side::Right)))],
        FACE_REGION,
    );
    d.add_polygon(DecompWire::new(si.iter().map(|&s| (s, Side::Left))), vec![], 0);
    d
}
