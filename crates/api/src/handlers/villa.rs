//! Handlers for the `/villas` resource.
//!
//! Bodies are extracted as `Option<T>` so a JSON `null` reaches the service
//! as "absent" and is rejected there with the same error as any other
//! missing input. Extractor rejections are turned into JSON 400s.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use villa_core::patch::PatchOperation;
use villa_core::types::DbId;
use villa_core::villa::VillaDto;

use crate::error::AppResult;
use crate::routes::VILLAS_PATH;
use crate::state::AppState;

/// GET /api/v1/villas
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<VillaDto>>> {
    let villas = state.villas.list().await?;
    Ok(Json(villas))
}

/// GET /api/v1/villas/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<VillaDto>> {
    let Path(id) = path?;
    let villa = state.villas.get(id).await?;
    Ok(Json(villa))
}

/// POST /api/v1/villas
///
/// Responds 201 with the created villa and a `Location` header pointing at it.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Option<VillaDto>>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = body?;
    let villa = state.villas.create(input).await?;
    let location = format!("{VILLAS_PATH}/{}", villa.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(villa),
    ))
}

/// PUT /api/v1/villas/{id}
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    body: Result<Json<Option<VillaDto>>, JsonRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = path?;
    let Json(input) = body?;
    state.villas.full_update(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/villas/{id}
///
/// Body is a JSON-Patch style list of operations.
pub async fn patch(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    body: Result<Json<Option<Vec<PatchOperation>>>, JsonRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = path?;
    let Json(operations) = body?;
    state.villas.partial_update(id, operations).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/villas/{id}
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = path?;
    state.villas.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
