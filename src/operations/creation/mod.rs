mod import_decomposition;
mod make_wire;

pub use import_decomposition::{ImportDecomposition, ImportedShapes};
pub use make_wire::MakeWire;
