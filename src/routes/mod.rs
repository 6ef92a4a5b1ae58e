//! Router assembly: common and marker routes behind tracing and a body size limit.

mod common;
mod markers;

pub use common::common_routes;
pub use markers::marker_routes;

use crate::error::error_response;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, http::StatusCode, response::Response, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found".to_string())
}

pub(crate) async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method not allowed".to_string(),
    )
}

/// The full application. Unknown routes answer `{code: 404, message: "Not found"}`.
///
/// `body_limit` replaces axum's default limit; bodies over it are rejected by
/// [`crate::extractors::JsonBody`] with a JSON 413.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(marker_routes(state))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
}
