pub mod gradient;
pub mod layer;
pub mod projector;

pub use gradient::*;
pub use layer::*;
pub use projector::*;
