//! Marker CRUD handlers: list, create, get, update, remove.
//!
//! Every handler validates its input against the route schema first. Routes
//! carrying `:markerId` then resolve the marker through [`load`] before doing
//! anything else, so an unknown id short-circuits to 404.

use crate::error::{AppError, ErrorBody, ValidationErrorBody};
use crate::extractors::{JsonBody, MarkerIdPath};
use crate::model::{ListParams, Marker, MarkerPatch, MarkerView, NewMarker};
use crate::response::{success_many, success_one, success_one_ok};
use crate::service::schemas::{self, MARKER_ID_PARAM};
use crate::service::{MarkerService, RequestInput};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::collections::HashMap;

/// Id guard for `/markers/:markerId` routes.
pub async fn load(state: &AppState, marker_id: &str) -> Result<Marker, AppError> {
    MarkerService::get(state.store.as_ref(), marker_id).await
}

#[utoipa::path(
    get,
    path = "/markers",
    tag = "markers",
    params(ListParams),
    responses(
        (status = 200, description = "One page of markers, title descending", body = [MarkerView]),
        (status = 400, description = "Invalid pagination parameters", body = ValidationErrorBody)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let validated = schemas::list_markers().validate(&RequestInput::new().query(query))?;
    let params: ListParams = validated.query_as()?;
    let markers = MarkerService::list(state.store.as_ref(), &params).await?;
    Ok(success_many(markers.iter().map(Marker::transform).collect()))
}

#[utoipa::path(
    post,
    path = "/markers",
    tag = "markers",
    request_body = NewMarker,
    responses(
        (status = 201, description = "Marker created", body = MarkerView),
        (status = 400, description = "Invalid marker fields", body = ValidationErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let validated = schemas::create_marker().validate(&RequestInput::new().body(body))?;
    let marker: NewMarker = validated.body_as()?;
    let created = MarkerService::create(state.store.as_ref(), marker).await?;
    Ok(success_one(created.transform()))
}

#[utoipa::path(
    get,
    path = "/markers/{markerId}",
    tag = "markers",
    params(("markerId" = String, Path, description = "24 character hex marker id")),
    responses(
        (status = 200, description = "The marker", body = MarkerView),
        (status = 400, description = "Malformed id", body = ValidationErrorBody),
        (status = 404, description = "Marker does not exist", body = ErrorBody)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    MarkerIdPath(marker_id): MarkerIdPath,
) -> Result<impl IntoResponse, AppError> {
    schemas::get_or_delete_marker()
        .validate(&RequestInput::new().param(MARKER_ID_PARAM, marker_id.as_str()))?;
    let marker = load(&state, &marker_id).await?;
    Ok(success_one_ok(marker.transform()))
}

#[utoipa::path(
    patch,
    path = "/markers/{markerId}",
    tag = "markers",
    params(("markerId" = String, Path, description = "24 character hex marker id")),
    request_body = MarkerPatch,
    responses(
        (status = 200, description = "The marker after the update", body = MarkerView),
        (status = 400, description = "Malformed id or fields", body = ValidationErrorBody),
        (status = 404, description = "Marker does not exist", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    MarkerIdPath(marker_id): MarkerIdPath,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let input = RequestInput::new()
        .param(MARKER_ID_PARAM, marker_id.as_str())
        .body(body);
    let validated = schemas::update_marker().validate(&input)?;
    let patch: MarkerPatch = validated.body_as()?;
    let marker = load(&state, &marker_id).await?;
    let updated = MarkerService::update(state.store.as_ref(), &marker.id, patch).await?;
    Ok(success_one_ok(updated.transform()))
}

#[utoipa::path(
    delete,
    path = "/markers/{markerId}",
    tag = "markers",
    params(("markerId" = String, Path, description = "24 character hex marker id")),
    responses(
        (status = 204, description = "Marker removed"),
        (status = 400, description = "Malformed id", body = ValidationErrorBody),
        (status = 404, description = "Marker does not exist", body = ErrorBody)
    )
)]
pub async fn remove(
    State(state): State<AppState>,
    MarkerIdPath(marker_id): MarkerIdPath,
) -> Result<impl IntoResponse, AppError> {
    schemas::get_or_delete_marker()
        .validate(&RequestInput::new().param(MARKER_ID_PARAM, marker_id.as_str()))?;
    let marker = load(&state, &marker_id).await?;
    MarkerService::remove(state.store.as_ref(), &marker.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
