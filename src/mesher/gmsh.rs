use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};

use super::Mesher;
use crate::error::{MesherError, Result};

const DEFAULT_PROGRAM: &str = "gmsh";

/// The gmsh command line mesher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gmsh {
    program: PathBuf,
    dimension: u8,
}

impl Gmsh {
    /// Uses `executable` when it names an existing file or a bare program
    /// name, otherwise `gmsh` from `PATH`.
    #[must_use]
    pub fn new(executable: Option<&Path>) -> Self {
        let program = match executable {
            Some(path) if path.exists() || path.components().count() == 1 => path.to_path_buf(),
            Some(path) => {
                warn!(path = %path.display(), "gmsh executable not found, using {}", DEFAULT_PROGRAM);
                PathBuf::from(DEFAULT_PROGRAM)
            }
            None => PathBuf::from(DEFAULT_PROGRAM),
        };
        Self {
            program,
            dimension: 2,
        }
    }

    /// Sets the dimension of the generated mesh.
    #[must_use]
    pub fn with_dimension(mut self, dimension: u8) -> Self {
        self.dimension = dimension;
        self
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for Gmsh {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Mesher for Gmsh {
    fn mesh(&self, script: &Path) -> Result<PathBuf> {
        let mut command = Command::new(&self.program);
        command
            .arg(format!("-{}", self.dimension))
            .args(["-format", "msh2"])
            .arg(script);
        info!(command = ?command, "running mesher");

        let output = command.output().map_err(|source| MesherError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;
        if !output.status.success() {
            warn!(stderr = %String::from_utf8_lossy(&output.stderr), "mesher failed");
            return Err(MesherError::Failed {
                status: output.status.to_string(),
            }
            .into());
        }

        let mesh = script.with_extension("msh");
        if !mesh.exists() {
            return Err(MesherError::MissingOutput(mesh).into());
        }
        Ok(mesh)
    }
}
