pub mod curve;
pub mod surface;

pub use curve::{Curve, Line, Line2d};
pub use surface::{Plane, Surface};
