//! SQL builder for the markers table: identifiers quoted, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
