use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::{EdgeId, FaceId, ShellId, SolidId, VertexId, WireId};

/// Topological dimension of a tracked shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Dimension {
    Vertex = 0,
    Edge = 1,
    Face = 2,
    Solid = 3,
}

impl Dimension {
    /// All dimensions in ascending order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Vertex,
        Dimension::Edge,
        Dimension::Face,
        Dimension::Solid,
    ];

    /// Returns the dimension as an array index in `0..4`.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Dimension {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Vertex),
            1 => Ok(Self::Edge),
            2 => Ok(Self::Face),
            3 => Ok(Self::Solid),
            other => Err(ConfigError::InvalidDimension(other)),
        }
    }
}

impl From<Dimension> for u8 {
    fn from(dim: Dimension) -> Self {
        dim as u8
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// A reference to any entity of the topology store.
///
/// Vertices, edges, faces and solids carry a [`Dimension`]; wires and
/// shells only connect them and are never meshed on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Vertex(VertexId),
    Edge(EdgeId),
    Wire(WireId),
    Face(FaceId),
    Shell(ShellId),
    Solid(SolidId),
}

impl Shape {
    /// Returns the dimension of the shape, or `None` for wires and shells.
    #[must_use]
    pub fn dimension(self) -> Option<Dimension> {
        match self {
            Self::Vertex(_) => Some(Dimension::Vertex),
            Self::Edge(_) => Some(Dimension::Edge),
            Self::Face(_) => Some(Dimension::Face),
            Self::Solid(_) => Some(Dimension::Solid),
            Self::Wire(_) | Self::Shell(_) => None,
        }
    }
}

impl From<VertexId> for Shape {
    fn from(id: VertexId) -> Self {
        Self::Vertex(id)
    }
}

impl From<EdgeId> for Shape {
    fn from(id: EdgeId) -> Self {
        Self::Edge(id)
    }
}

impl From<WireId> for Shape {
    fn from(id: WireId) -> Self {
        Self::Wire(id)
    }
}

impl From<FaceId> for Shape {
    fn from(id: FaceId) -> Self {
        Self::Face(id)
    }
}

impl From<ShellId> for Shape {
    fn from(id: ShellId) -> Self {
        Self::Shell(id)
    }
}

impl From<SolidId> for Shape {
    fn from(id: SolidId) -> Self {
        Self::Solid(id)
    }
}
