//! MarkerService plus the declarative request validation it is fronted by.

mod markers;
pub mod schemas;
mod validation;
pub use markers::{MarkerService, NOT_FOUND_MESSAGE};
pub use validation::{
    FieldError, FieldRule, Location, RequestInput, RouteSchema, Validated, ValidationErrors,
};
