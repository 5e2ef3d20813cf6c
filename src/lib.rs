pub mod brep;
pub mod config;
pub mod decomposition;
pub mod error;
pub mod geometry;
pub mod math;
pub mod mesher;
pub mod msh;
pub mod operations;
pub mod pipeline;
pub mod region;
pub mod shape_graph;
pub mod shape_index;
pub mod topology;

#[cfg(test)]
mod fixtures;

pub use error::{FracmeshError, Result};
