//! OpenAPI document served at `/docs`.

use crate::error::{ErrorBody, ValidationErrorBody};
use crate::handlers;
use crate::model::{MarkerPatch, MarkerView, NewMarker};
use crate::service::{FieldError, Location};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Markers API",
        description = "Create, list, read, update and delete geographic markers."
    ),
    paths(
        handlers::markers::list,
        handlers::markers::create,
        handlers::markers::get,
        handlers::markers::update,
        handlers::markers::remove,
    ),
    components(schemas(
        MarkerView,
        NewMarker,
        MarkerPatch,
        ErrorBody,
        ValidationErrorBody,
        FieldError,
        Location,
    )),
    tags((name = "markers", description = "Marker CRUD"))
)]
pub struct ApiDoc;
