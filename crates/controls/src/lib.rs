//! Interactive controls for the viewer: the place-search suggest box and
//! the time-range selector.
//!
//! [`suggest::SearchSuggestBox`] is a pure state machine that emits
//! [`suggest::SuggestCommand`]s; [`driver::SuggestDriver`] executes those
//! commands on a tokio runtime against a [`providers::geocode::GeoSuggestProvider`].

pub mod driver;
pub mod suggest;
pub mod time_range;

pub use driver::*;
pub use suggest::*;
pub use time_range::*;
