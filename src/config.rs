//! Run configuration: regions, meshing parameters and the mesher location.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::operations::meshing::PHYSICAL_ID_OFFSET;
use crate::region::RegionTable;

/// Parameters controlling mesh-step estimation and mesher output.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MeshingParams {
    /// The global step is the largest bounding box extent over this value.
    pub step_divisor: f64,
    /// Offset added to region ids to form physical group ids.
    pub physical_id_offset: u32,
    /// Scale of the mesher's random perturbation, relative to
    /// `max_extent / h_min`.
    pub random_factor_scale: f64,
    /// Fixed `(min, max)` characteristic length bounds. When unset the
    /// range of steps requested by regions is used.
    pub step_range: Option<(f64, f64)>,
    /// Dimension of the generated mesh.
    pub mesh_dimension: u8,
}

impl Default for MeshingParams {
    fn default() -> Self {
        Self {
            step_divisor: 20.0,
            physical_id_offset: PHYSICAL_ID_OFFSET,
            random_factor_scale: 1e-14,
            step_range: None,
            mesh_dimension: 2,
        }
    }
}

/// Everything a meshing run needs besides the geometry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub regions: RegionTable,
    #[serde(default)]
    pub meshing: MeshingParams,
    /// Path of the gmsh executable. `gmsh` on `PATH` when unset.
    #[serde(default)]
    pub gmsh: Option<PathBuf>,
}

impl Config {
    /// Parses a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON, invalid region
    /// ids or dimensions.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json).map_err(ConfigError::from)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, otherwise as
    /// [`Config::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
