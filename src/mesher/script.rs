use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::MeshingParams;
use crate::error::{OperationError, Result};
use crate::operations::meshing::MeshStepDistribution;
use crate::operations::query::Aabb;

/// A gmsh `.geo` script loading a BREP file and setting the mesh step of
/// every vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct MesherScript {
    brep_path: PathBuf,
    h_min: f64,
    h_max: f64,
    random_factor: f64,
    vertex_steps: Vec<(u32, f64)>,
}

impl MesherScript {
    /// Prepares the script for the given step distribution.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if the characteristic
    /// length bounds are not `0 < h_min <= h_max`.
    pub fn new(
        brep_path: impl Into<PathBuf>,
        distribution: &MeshStepDistribution,
        aabb: &Aabb,
        params: &MeshingParams,
    ) -> Result<Self> {
        let (h_min, h_max) = params
            .step_range
            .unwrap_or((distribution.min_step, distribution.max_step));
        if !(h_min > 0.0 && h_min <= h_max) {
            return Err(OperationError::InvalidInput(format!(
                "invalid characteristic length range [{h_min}, {h_max}]"
            ))
            .into());
        }
        Ok(Self {
            brep_path: brep_path.into(),
            h_min,
            h_max,
            random_factor: params.random_factor_scale * aabb.max_extent() / h_min,
            vertex_steps: distribution.vertex_steps.clone(),
        })
    }

    #[must_use]
    pub fn brep_path(&self) -> &Path {
        &self.brep_path
    }

    #[must_use]
    pub fn length_range(&self) -> (f64, f64) {
        (self.h_min, self.h_max)
    }

    #[must_use]
    pub fn random_factor(&self) -> f64 {
        self.random_factor
    }

    /// Writes the script.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if writing fails.
    pub fn write<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "SetFactory(\"OpenCASCADE\");")?;
        writeln!(out, "Mesh.CharacteristicLengthMin = {};", self.h_min)?;
        writeln!(out, "Mesh.CharacteristicLengthMax = {};", self.h_max)?;
        writeln!(out, "Mesh.RandomFactor = {:e};", self.random_factor)?;
        writeln!(out, "ShapeFromFile(\"{}\");", self.brep_path.display())?;
        for (generator_id, step) in &self.vertex_steps {
            writeln!(out, "Characteristic Length {{{generator_id}}} = {step};")?;
        }
        Ok(())
    }
}
