//! Meshes a planar fracture network with gmsh.
//!
//! Usage:
//! ```text
//! cargo run --example prepare -- <config.json> <decomposition.json>... <output base>
//! ```
//!
//! Writes `<base>.brep`, `<base>.tmp.geo` and the tagged mesh `<base>.msh`.

use std::path::PathBuf;
use std::process::ExitCode;

use fracmesh::config::Config;
use fracmesh::decomposition::Decomposition;
use fracmesh::mesher::Gmsh;
use fracmesh::pipeline::MeshPreparation;
use fracmesh::FracmeshError;
use tracing::error;

fn run(config: &str, decompositions: &[String], basename: &str) -> Result<(), FracmeshError> {
    let config = Config::load(config)?;
    let decompositions = decompositions
        .iter()
        .map(|path| {
            let json = std::fs::read_to_string(path)?;
            serde_json::from_str::<Decomposition>(&json)
                .map_err(|e| FracmeshError::from(fracmesh::error::ConfigError::from(e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let gmsh = Gmsh::new(config.gmsh.as_deref()).with_dimension(config.meshing.mesh_dimension);
    let mut run = MeshPreparation::from_config(PathBuf::from(basename), &config);
    let mesh = run.execute(&decompositions, &gmsh)?;
    println!(
        "{} nodes, {} elements, {} physical groups",
        mesh.nodes.len(),
        mesh.elements.len(),
        mesh.physical.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    // Default: WARN for everything, INFO for fracmesh.
    // Override with RUST_LOG env var (e.g. RUST_LOG=fracmesh=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("fracmesh=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [config, decompositions @ .., basename] = args.as_slice() else {
        eprintln!("usage: prepare <config.json> <decomposition.json>... <output base>");
        return ExitCode::FAILURE;
    };
    if decompositions.is_empty() {
        eprintln!("at least one decomposition is required");
        return ExitCode::FAILURE;
    }

    match run(config, decompositions, basename) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
