use axum::{extract::State, Extension};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::auth_service::Profile;
use crate::state::AppState;

/// GET /api/profile - Identity carried by the caller's token
pub async fn profile_get(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Profile> {
    Ok(ApiResponse::success(state.auth.profile(&user)).with_message("Profile berhasil diambil"))
}
