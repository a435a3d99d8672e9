// handlers/protected/alumni.rs - /api/alumni

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;

use crate::database::models::{Alumni, AlumniInput};
use crate::filter::PageQuery;
use crate::middleware::{ApiResponse, ApiResult, PagedResponse, PagedResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusKematianRequest {
    pub status_kematian: bool,
}

/// GET /api/alumni - All alumni, newest first
pub async fn alumni_list(State(state): State<AppState>) -> ApiResult<Vec<Alumni>> {
    Ok(ApiResponse::success(state.alumni.list().await?))
}

/// GET /api/alumni/pagination?page=&limit=&search=&sortBy=&order=
pub async fn alumni_page(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> PagedResult<Alumni> {
    let Query(query) = query?;
    let (data, meta) = state.alumni.page(&query).await?;
    Ok(PagedResponse { data, meta })
}

/// GET /api/alumni/:id
pub async fn alumni_get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Alumni> {
    let Path(id) = id?;
    Ok(ApiResponse::success(state.alumni.get(id).await?))
}

/// POST /api/alumni - Creates the alumni and its user account in one transaction
pub async fn alumni_create(
    State(state): State<AppState>,
    payload: Result<Json<AlumniInput>, JsonRejection>,
) -> ApiResult<Alumni> {
    let Json(input) = payload?;
    let alumni = state.alumni.create(input).await?;
    Ok(ApiResponse::created(alumni).with_message("Alumni berhasil dibuat"))
}

/// PUT /api/alumni/:id
pub async fn alumni_update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<AlumniInput>, JsonRejection>,
) -> ApiResult<Alumni> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let alumni = state.alumni.update(id, input).await?;
    Ok(ApiResponse::success(alumni).with_message("Alumni berhasil diperbarui"))
}

/// DELETE /api/alumni/:id
pub async fn alumni_delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    state.alumni.delete(id).await?;
    Ok(ApiResponse::message("Alumni berhasil dihapus"))
}

/// PUT /api/alumni/:id/kematian
pub async fn alumni_kematian_put(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<StatusKematianRequest>, JsonRejection>,
) -> ApiResult<Alumni> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let alumni = state.alumni.set_status_kematian(id, request.status_kematian).await?;
    Ok(ApiResponse::success(alumni).with_message("Status kematian diperbarui"))
}
