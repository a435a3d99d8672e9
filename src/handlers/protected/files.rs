// handlers/protected/files.rs - /api/files

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::PathRejection,
        Multipart, Path, State,
    },
    Extension,
};

use crate::database::models::FileView;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::file_service::{UploadForm, UploadedFile};
use crate::state::AppState;

fn multipart_error(e: MultipartError) -> ApiError {
    ApiError::bad_request(format!("Upload tidak valid: {}", e.body_text()))
}

/// Collect the `file`, `category` and `user_id` parts; anything else is skipped
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.file = Some(UploadedFile {
                    original_name,
                    content_type,
                    bytes,
                });
            }
            "category" => form.category = Some(field.text().await.map_err(multipart_error)?),
            "user_id" => form.user_id = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/files/upload - multipart with `file`, optional `category` and (admins) `user_id`
pub async fn file_upload(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<FileView> {
    let multipart = multipart.map_err(|e| ApiError::bad_request(format!("Upload tidak valid: {}", e.body_text())))?;
    let form = read_upload_form(multipart).await?;
    let file = state.files.upload(&user, form).await?;
    Ok(ApiResponse::success(file).with_message("file berhasil diupload"))
}

/// GET /api/files
pub async fn file_list(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<FileView>> {
    Ok(ApiResponse::success(state.files.list(&user).await?))
}

/// GET /api/files/:id
pub async fn file_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<FileView> {
    let Path(id) = id?;
    Ok(ApiResponse::success(state.files.get(&user, &id).await?))
}

/// DELETE /api/files/:id
pub async fn file_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    state.files.delete(&user, &id).await?;
    Ok(ApiResponse::message("file berhasil dihapus"))
}
