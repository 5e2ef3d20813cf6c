//! Driving the external mesh generator.

mod gmsh;
mod script;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use gmsh::Gmsh;
pub use script::MesherScript;

/// An external mesh generator run on a control script.
pub trait Mesher {
    /// Meshes the geometry described by `script`, blocking until the
    /// mesher exits, and returns the path of the generated mesh.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::MesherError`] if the mesher cannot be
    /// started, fails, or produces no mesh.
    fn mesh(&self, script: &Path) -> Result<PathBuf>;
}
