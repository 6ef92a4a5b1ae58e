//! Marker CRUD routes.

use super::method_not_allowed;
use crate::handlers::markers::{create, get as get_handler, list, remove, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn marker_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/markers",
            get(list).post(create).fallback(method_not_allowed),
        )
        .route(
            "/markers/:markerId",
            get(get_handler)
                .patch(update)
                .delete(remove)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}
