//! Planar polygon decomposition: the input of the shape-graph builder.
//!
//! Points, segments and polygons are keyed by `u32` ids and kept in
//! ordered maps, so imports enumerate them in a reproducible order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::math::Point2;
use crate::region::{RegionId, UNASSIGNED};

/// Side of a directed segment on which a polygon lies.
///
/// A wire traverses a segment on its `Left` side from the first to the
/// second point, and on its `Right` side from the second to the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompPoint {
    pub xy: [f64; 2],
    #[serde(default)]
    pub region: RegionId,
}

impl DecompPoint {
    #[must_use]
    pub fn point(&self) -> Point2 {
        Point2::new(self.xy[0], self.xy[1])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompSegment {
    /// Ids of the first and second point.
    pub vtxs: [u32; 2],
    #[serde(default)]
    pub region: RegionId,
}

/// One segment of a wire together with the side the wire runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSegment {
    pub segment: u32,
    pub side: Side,
}

/// A closed boundary loop, as an ordered list of oriented segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecompWire {
    pub segments: Vec<WireSegment>,
}

impl DecompWire {
    #[must_use]
    pub fn new(segments: impl IntoIterator<Item = (u32, Side)>) -> Self {
        Self {
            segments: segments
                .into_iter()
                .map(|(segment, side)| WireSegment { segment, side })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompPolygon {
    /// Counter-clockwise boundary, with the polygon on its left.
    pub outer_wire: DecompWire,
    /// Boundaries of holes directly inside this polygon. Like the outer
    /// wire they keep the polygon on their left, so they run clockwise.
    #[serde(default)]
    pub holes: Vec<DecompWire>,
    #[serde(default)]
    pub region: RegionId,
    /// The unbounded polygon surrounding the whole decomposition.
    #[serde(default)]
    pub is_outer: bool,
}

/// A planar decomposition into points, segments and polygons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    #[serde(default)]
    pub points: BTreeMap<u32, DecompPoint>,
    #[serde(default)]
    pub segments: BTreeMap<u32, DecompSegment>,
    #[serde(default)]
    pub polygons: BTreeMap<u32, DecompPolygon>,
}

impl Decomposition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an untagged point and returns its id.
    pub fn add_point(&mut self, x: f64, y: f64) -> u32 {
        self.add_tagged_point(x, y, UNASSIGNED)
    }

    /// Adds a point owned by `region` and returns its id.
    pub fn add_tagged_point(&mut self, x: f64, y: f64, region: RegionId) -> u32 {
        let id = next_id(&self.points);
        self.points.insert(id, DecompPoint { xy: [x, y], region });
        id
    }

    /// Adds an untagged segment between two point ids and returns its id.
    pub fn add_segment(&mut self, a: u32, b: u32) -> u32 {
        self.add_tagged_segment(a, b, UNASSIGNED)
    }

    /// Adds a segment owned by `region` and returns its id.
    pub fn add_tagged_segment(&mut self, a: u32, b: u32, region: RegionId) -> u32 {
        let id = next_id(&self.segments);
        self.segments.insert(id, DecompSegment { vtxs: [a, b], region });
        id
    }

    /// Adds a bounded polygon and returns its id.
    pub fn add_polygon(&mut self, outer_wire: DecompWire, holes: Vec<DecompWire>, region: RegionId) -> u32 {
        let id = next_id(&self.polygons);
        self.polygons.insert(
            id,
            DecompPolygon {
                outer_wire,
                holes,
                region,
                is_outer: false,
            },
        );
        id
    }

    /// Adds the unbounded outer polygon and returns its id.
    pub fn add_outer_polygon(&mut self, holes: Vec<DecompWire>) -> u32 {
        let id = next_id(&self.polygons);
        self.polygons.insert(
            id,
            DecompPolygon {
                outer_wire: DecompWire::default(),
                holes,
                region: UNASSIGNED,
                is_outer: true,
            },
        );
        id
    }
}

fn next_id<T>(map: &BTreeMap<u32, T>) -> u32 {
    map.keys().next_back().map_or(0, |last| last + 1)
}
