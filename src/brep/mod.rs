//! BREP text serialization of the free-shape compound.

mod numbering;
mod writer;

pub use numbering::{BrepShape, ShapeNumbering};
pub use writer::WriteBrep;
