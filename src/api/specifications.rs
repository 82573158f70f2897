// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Specification CRUD endpoints.
//!
//! All five handlers map one-to-one onto the repository operations; the
//! access-policy middleware has already authenticated the caller by the
//! time any of them runs.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::ApiError,
    models::{Specification, SpecificationPayload},
    state::AppState,
    storage::SpecificationRepository,
};

/// List all specifications.
#[utoipa::path(
    get,
    path = "/api/specifications",
    tag = "Specifications",
    security(("bearer" = [])),
    responses((status = 200, body = [Specification]))
)]
pub async fn list_specifications(
    State(state): State<AppState>,
) -> Result<Json<Vec<Specification>>, ApiError> {
    let repo = SpecificationRepository::new(&state.db);
    Ok(Json(repo.list()?))
}

/// Fetch one specification by id.
#[utoipa::path(
    get,
    path = "/api/specifications/{id}",
    params(("id" = i64, Path, description = "Specification id")),
    tag = "Specifications",
    security(("bearer" = [])),
    responses(
        (status = 200, body = Specification),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get_specification(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Specification>, ApiError> {
    let repo = SpecificationRepository::new(&state.db);
    repo.get(id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Specification {id} not found")))
}

/// Create a specification with its sections.
#[utoipa::path(
    post,
    path = "/api/specifications",
    request_body = SpecificationPayload,
    tag = "Specifications",
    security(("bearer" = [])),
    responses((status = 200, body = Specification))
)]
pub async fn create_specification(
    State(state): State<AppState>,
    Json(payload): Json<SpecificationPayload>,
) -> Result<Json<Specification>, ApiError> {
    let repo = SpecificationRepository::new(&state.db);
    let spec = repo.create(&payload)?;
    tracing::info!(id = spec.id, sections = spec.sections.len(), "specification created");
    Ok(Json(spec))
}

/// Replace a specification wholesale. Not an upsert: unknown ids 404.
#[utoipa::path(
    put,
    path = "/api/specifications/{id}",
    params(("id" = i64, Path, description = "Specification id")),
    request_body = SpecificationPayload,
    tag = "Specifications",
    security(("bearer" = [])),
    responses(
        (status = 200, body = Specification),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn update_specification(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<SpecificationPayload>,
) -> Result<Json<Specification>, ApiError> {
    let repo = SpecificationRepository::new(&state.db);
    repo.update(id, &payload)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Specification {id} not found")))
}

/// Delete a specification and all of its sections.
#[utoipa::path(
    delete,
    path = "/api/specifications/{id}",
    params(("id" = i64, Path, description = "Specification id")),
    tag = "Specifications",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn delete_specification(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let repo = SpecificationRepository::new(&state.db);
    if repo.delete(id)? {
        tracing::info!(id, "specification deleted");
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::not_found(format!("Specification {id} not found")))
    }
}
