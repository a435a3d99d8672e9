// handlers/protected/pekerjaan_mongo.rs - /api/pekerjaan-mongo (document store)

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use crate::database::models::PekerjaanDocView;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::pekerjaan_doc_service::{CreatePekerjaanDocRequest, UpdatePekerjaanDocRequest};
use crate::state::AppState;

pub async fn pekerjaan_mongo_list(State(state): State<AppState>) -> ApiResult<Vec<PekerjaanDocView>> {
    Ok(ApiResponse::success(state.pekerjaan_doc.list().await?))
}

pub async fn pekerjaan_mongo_get(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<PekerjaanDocView> {
    let Path(id) = id?;
    Ok(ApiResponse::success(state.pekerjaan_doc.get(&id).await?))
}

pub async fn pekerjaan_mongo_by_alumni(
    State(state): State<AppState>,
    alumni_id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Vec<PekerjaanDocView>> {
    let Path(alumni_id) = alumni_id?;
    Ok(ApiResponse::success(state.pekerjaan_doc.list_by_alumni(alumni_id).await?))
}

pub async fn pekerjaan_mongo_trashed(State(state): State<AppState>) -> ApiResult<Vec<PekerjaanDocView>> {
    Ok(ApiResponse::success(state.pekerjaan_doc.list_trashed().await?))
}

pub async fn pekerjaan_mongo_create(
    State(state): State<AppState>,
    payload: Result<Json<CreatePekerjaanDocRequest>, JsonRejection>,
) -> ApiResult<PekerjaanDocView> {
    let Json(request) = payload?;
    let created = state.pekerjaan_doc.create(request).await?;
    Ok(ApiResponse::created(created).with_message("Data pekerjaan berhasil ditambahkan"))
}

pub async fn pekerjaan_mongo_update(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdatePekerjaanDocRequest>, JsonRejection>,
) -> ApiResult<PekerjaanDocView> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let updated = state.pekerjaan_doc.update(&id, request).await?;
    Ok(ApiResponse::success(updated).with_message("Data pekerjaan berhasil diperbarui"))
}

pub async fn pekerjaan_mongo_soft_delete(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<PekerjaanDocView> {
    let Path(id) = id?;
    let doc = state.pekerjaan_doc.soft_delete(&id).await?;
    Ok(ApiResponse::success(doc).with_message("Data pekerjaan dipindahkan ke trash"))
}

pub async fn pekerjaan_mongo_restore(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<PekerjaanDocView> {
    let Path(id) = id?;
    let doc = state.pekerjaan_doc.restore(&id).await?;
    Ok(ApiResponse::success(doc).with_message("Data pekerjaan berhasil direstore"))
}

pub async fn pekerjaan_mongo_delete(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    state.pekerjaan_doc.delete(&id).await?;
    Ok(ApiResponse::message("Data pekerjaan dihapus permanen"))
}
