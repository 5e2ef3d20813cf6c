mod distribute_mesh_step;
mod tag_regions;

pub use distribute_mesh_step::{DistributeMeshStep, MeshStepDistribution};
pub use tag_regions::{element_dimension, TagRegions, TaggedElements, PHYSICAL_ID_OFFSET};
