// handlers/public/auth/login.rs - POST /api/login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::auth_service::{LoginRequest, LoginResponse};
use crate::state::AppState;

/// POST /api/login - Authenticate with username (or email) and password
///
/// ```json
/// { "username": "budi", "password": "123456" }
/// ```
///
/// Responds with the user record and a bearer token:
///
/// ```json
/// { "success": true, "message": "Login berhasil",
///   "data": { "user": { "id": 1, "username": "budi", ... }, "token": "eyJ..." } }
/// ```
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(request) = payload?;
    let response = state.auth.login(request).await?;
    Ok(ApiResponse::success(response).with_message("Login berhasil"))
}
