//! Request extractors shared by the handlers.

mod body;
mod path;
pub use body::JsonBody;
pub use path::MarkerIdPath;
