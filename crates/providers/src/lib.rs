//! External data providers behind dyn-compatible traits.
//!
//! Two provider seams exist:
//! - [`PollutionDataProvider`]: spatial pollutant samples + summary stats
//!   for a viewport center.
//! - [`GeoSuggestProvider`]: ranked place candidates for a text fragment.
//!
//! Each has an HTTP implementation and an in-memory implementation for
//! tests and offline runs. Failures stay local: callers log and degrade
//! to a quiet no-op, they never retry automatically.

pub mod error;
pub mod geocode;
pub mod memory;
pub mod pollution;

pub use error::*;
pub use geocode::*;
pub use memory::*;
pub use pollution::*;

use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Bounded timeout applied to every provider query.
pub const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);
