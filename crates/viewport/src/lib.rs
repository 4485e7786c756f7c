pub mod controller;
pub mod surface;
pub mod teardown;

pub use controller::*;
pub use surface::*;
pub use teardown::*;
