pub mod geo;
pub mod pollutant;
pub mod sample;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use geo::*;
pub use pollutant::*;
pub use sample::*;
pub use time::*;
