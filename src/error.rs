use std::path::PathBuf;

use thiserror::Error;

use crate::topology::Dimension;

/// Top-level error type for the geometry preparation step.
#[derive(Debug, Error)]
pub enum FracmeshError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Mesher(#[from] MesherError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the shape hierarchy.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("wire is not closed")]
    WireNotClosed,

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to geometry preparation operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("empty list of shapes to mesh")]
    EmptyShapeSet,

    #[error("operation called out of order: {0}")]
    NotReady(&'static str),
}

/// Errors raised while reading or reconciling a generated mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("mesh parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("element {element} has {tags} tag(s), at least 2 required")]
    MalformedElement { element: u32, tags: usize },

    #[error("element {element} has unsupported type {el_type}")]
    UnknownElementType { element: u32, el_type: u32 },

    #[error("element {element} refers to unknown shape {shape_id} of dimension {dim}")]
    UnknownShape {
        element: u32,
        dim: Dimension,
        shape_id: u32,
    },

    #[error("region '{region}' of dimension {region_dim} holds an element of dimension {element_dim}")]
    DimensionMismatch {
        region: String,
        region_dim: Dimension,
        element_dim: Dimension,
    },

    #[error("physical group '{name}' already has id {existing}, got {new}")]
    PhysicalGroupConflict { name: String, existing: u32, new: u32 },

    #[error("physical id of region {region} overflows with offset {offset}")]
    PhysicalIdOverflow { region: u32, offset: u32 },
}

/// Errors from the external mesh generator.
#[derive(Debug, Error)]
pub enum MesherError {
    #[error("failed to start mesher '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("mesher exited with {status}")]
    Failed { status: String },

    #[error("mesher produced no output file {}", .0.display())]
    MissingOutput(PathBuf),
}

/// Errors in the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("region id 0 is reserved for unassigned shapes")]
    ReservedRegionId,

    #[error("duplicate region id {0}")]
    DuplicateRegion(u32),

    #[error("unknown region id {0}")]
    UnknownRegion(u32),

    #[error("invalid dimension {0}, expected 0..=3")]
    InvalidDimension(u8),
}

/// Convenience type alias for results using [`FracmeshError`].
pub type Result<T> = std::result::Result<T, FracmeshError>;
