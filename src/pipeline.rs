//! The full geometry preparation run, from decompositions to a tagged mesh.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use tracing::info;

use crate::brep::WriteBrep;
use crate::config::{Config, MeshingParams};
use crate::decomposition::Decomposition;
use crate::error::{OperationError, Result};
use crate::mesher::{Mesher, MesherScript};
use crate::msh::GmshMesh;
use crate::operations::creation::{ImportDecomposition, ImportedShapes};
use crate::operations::meshing::{DistributeMeshStep, MeshStepDistribution, TagRegions};
use crate::operations::query::{Aabb, BoundingBox};
use crate::region::RegionTable;
use crate::shape_graph::ShapeGraph;
use crate::shape_index::ShapeIndex;

/// State of one meshing run. Output files are named after `basename`:
/// `<base>.brep`, `<base>.tmp.geo` and `<base>.msh`.
///
/// The steps must run in order; calling one too early returns
/// [`OperationError::NotReady`].
#[derive(Debug)]
pub struct MeshPreparation {
    basename: PathBuf,
    regions: RegionTable,
    params: MeshingParams,
    graph: ShapeGraph,
    brep_file: Option<PathBuf>,
    index: Option<ShapeIndex>,
    aabb: Option<Aabb>,
    distribution: Option<MeshStepDistribution>,
    script_file: Option<PathBuf>,
    generated_mesh: Option<PathBuf>,
}

impl MeshPreparation {
    #[must_use]
    pub fn new(basename: impl Into<PathBuf>, regions: RegionTable, params: MeshingParams) -> Self {
        Self {
            basename: basename.into(),
            regions,
            params,
            graph: ShapeGraph::new(),
            brep_file: None,
            index: None,
            aabb: None,
            distribution: None,
            script_file: None,
            generated_mesh: None,
        }
    }

    #[must_use]
    pub fn from_config(basename: impl Into<PathBuf>, config: &Config) -> Self {
        Self::new(basename, config.regions.clone(), config.meshing)
    }

    #[must_use]
    pub fn graph(&self) -> &ShapeGraph {
        &self.graph
    }

    #[must_use]
    pub fn index(&self) -> Option<&ShapeIndex> {
        self.index.as_ref()
    }

    #[must_use]
    pub fn distribution(&self) -> Option<&MeshStepDistribution> {
        self.distribution.as_ref()
    }

    /// Adds the shapes of a decomposition.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotReady`] once the BREP file is written,
    /// otherwise as [`ImportDecomposition::execute`].
    pub fn add_decomposition(&mut self, decomposition: &Decomposition) -> Result<ImportedShapes> {
        if self.brep_file.is_some() {
            return Err(
                OperationError::NotReady("decompositions must be added before the BREP file is written").into(),
            );
        }
        ImportDecomposition::new(decomposition, &self.regions).execute(&mut self.graph)
    }

    /// Writes the free shapes to `<base>.brep` and indexes them in the
    /// mesher's numbering. Returns the absolute path of the file.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::EmptyShapeSet`] if no vertex was imported
    /// and an I/O error if the file cannot be written.
    pub fn make_brep_geometry(&mut self) -> Result<PathBuf> {
        let aabb = BoundingBox::new().execute(&self.graph)?;
        let path = std::path::absolute(self.output_path(".brep"))?;

        let mut out = BufWriter::new(File::create(&path)?);
        let numbering = WriteBrep::new(&self.graph).execute(&mut out)?;
        out.flush()?;
        let index = ShapeIndex::build(&self.graph, &numbering);

        info!(path = %path.display(), shapes = numbering.len(), indexed = index.len(), "wrote BREP geometry");
        self.aabb = Some(aabb);
        self.index = Some(index);
        self.brep_file = Some(path.clone());
        Ok(path)
    }

    /// Resolves the mesh step of every vertex.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotReady`] before
    /// [`MeshPreparation::make_brep_geometry`], otherwise as
    /// [`DistributeMeshStep::execute`].
    pub fn distribute_mesh_step(&mut self) -> Result<&MeshStepDistribution> {
        let (Some(index), Some(aabb)) = (self.index.as_ref(), self.aabb.as_ref()) else {
            return Err(OperationError::NotReady("the BREP geometry must be made first").into());
        };
        let global_step = aabb.mesh_step_estimate(self.params.step_divisor);
        info!(global_step, max_extent = aabb.max_extent(), "estimated global mesh step");

        let distribution = DistributeMeshStep::new(&self.regions, index, global_step).execute(&mut self.graph)?;
        Ok(self.distribution.insert(distribution))
    }

    /// Writes the mesher control script to `<base>.tmp.geo`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotReady`] before the mesh step is
    /// distributed, otherwise as [`MesherScript::new`].
    pub fn write_mesher_script(&mut self) -> Result<PathBuf> {
        let (Some(brep), Some(distribution), Some(aabb)) =
            (self.brep_file.as_ref(), self.distribution.as_ref(), self.aabb.as_ref())
        else {
            return Err(OperationError::NotReady("the mesh step must be distributed first").into());
        };
        let script = MesherScript::new(brep.clone(), distribution, aabb, &self.params)?;
        let path = self.output_path(".tmp.geo");
        let mut out = BufWriter::new(File::create(&path)?);
        script.write(&mut out)?;
        out.flush()?;

        let (h_min, h_max) = script.length_range();
        info!(path = %path.display(), h_min, h_max, "wrote mesher script");
        self.script_file = Some(path.clone());
        Ok(path)
    }

    /// Runs `mesher` on the control script and returns the generated mesh.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotReady`] before the script is written,
    /// otherwise as [`Mesher::mesh`].
    pub fn call_mesher(&mut self, mesher: &dyn Mesher) -> Result<PathBuf> {
        let Some(script) = self.script_file.as_ref() else {
            return Err(OperationError::NotReady("the mesher script must be written first").into());
        };
        let mesh = mesher.mesh(script)?;
        info!(path = %mesh.display(), "mesher finished");
        self.generated_mesh = Some(mesh.clone());
        Ok(mesh)
    }

    /// Assigns the generated elements to region physical groups and writes
    /// the result to `<base>.msh`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotReady`] before the mesher ran, a
    /// [`crate::error::MeshError`] if the generated mesh cannot be read or
    /// tagged, and an I/O error if a file cannot be accessed.
    pub fn modify_mesh(&self) -> Result<GmshMesh> {
        let (Some(generated), Some(index)) = (self.generated_mesh.as_ref(), self.index.as_ref()) else {
            return Err(OperationError::NotReady("the mesher must run first").into());
        };
        let mut mesh = GmshMesh::read(BufReader::new(File::open(generated)?))?;
        TagRegions::new(&self.graph, index, &self.regions)
            .with_physical_id_offset(self.params.physical_id_offset)
            .execute(&mesh)?
            .apply_to(&mut mesh);

        let path = self.output_path(".msh");
        let mut out = BufWriter::new(File::create(&path)?);
        mesh.write_ascii(&mut out)?;
        out.flush()?;
        info!(path = %path.display(), elements = mesh.elements.len(), "wrote tagged mesh");
        Ok(mesh)
    }

    /// Runs every step on `decompositions`.
    ///
    /// # Errors
    ///
    /// Returns the first error of any step.
    pub fn execute<'d>(
        &mut self,
        decompositions: impl IntoIterator<Item = &'d Decomposition>,
        mesher: &dyn Mesher,
    ) -> Result<GmshMesh> {
        for decomposition in decompositions {
            self.add_decomposition(decomposition)?;
        }
        self.make_brep_geometry()?;
        self.distribute_mesh_step()?;
        self.write_mesher_script()?;
        self.call_mesher(mesher)?;
        self.modify_mesh()
    }

    fn output_path(&self, suffix: &str) -> PathBuf {
        let mut name = OsString::from(self.basename.as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    }
}
