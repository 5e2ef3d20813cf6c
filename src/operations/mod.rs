pub mod creation;
pub mod meshing;
pub mod query;
