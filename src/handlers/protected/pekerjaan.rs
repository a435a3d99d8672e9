// handlers/protected/pekerjaan.rs - /api/pekerjaan (relational store)

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};

use crate::database::models::Pekerjaan;
use crate::filter::PageQuery;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, PagedResponse, PagedResult};
use crate::services::pekerjaan_service::{CreatePekerjaanRequest, PekerjaanRequest};
use crate::state::AppState;

/// GET /api/pekerjaan - Live records
pub async fn pekerjaan_list(State(state): State<AppState>) -> ApiResult<Vec<Pekerjaan>> {
    Ok(ApiResponse::success(state.pekerjaan.list().await?))
}

/// GET /api/pekerjaan/list - Paginated live records
pub async fn pekerjaan_page(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> PagedResult<Pekerjaan> {
    let Query(query) = query?;
    let (data, meta) = state.pekerjaan.page(&query).await?;
    Ok(PagedResponse { data, meta })
}

/// GET /api/pekerjaan/trashed - All trashed rows for admins, owned ones otherwise
pub async fn pekerjaan_trashed(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Pekerjaan>> {
    Ok(ApiResponse::success(state.pekerjaan.list_trashed(&user).await?))
}

/// GET /api/pekerjaan/alumni/:alumni_id
pub async fn pekerjaan_by_alumni(
    State(state): State<AppState>,
    alumni_id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Vec<Pekerjaan>> {
    let Path(alumni_id) = alumni_id?;
    Ok(ApiResponse::success(state.pekerjaan.list_by_alumni(alumni_id).await?))
}

/// GET /api/pekerjaan/:id - Any state
pub async fn pekerjaan_get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Pekerjaan> {
    let Path(id) = id?;
    Ok(ApiResponse::success(state.pekerjaan.get(id).await?))
}

/// POST /api/pekerjaan
pub async fn pekerjaan_create(
    State(state): State<AppState>,
    payload: Result<Json<CreatePekerjaanRequest>, JsonRejection>,
) -> ApiResult<Pekerjaan> {
    let Json(request) = payload?;
    let created = state.pekerjaan.create(request).await?;
    Ok(ApiResponse::created(created).with_message("Pekerjaan berhasil dibuat"))
}

/// PUT /api/pekerjaan/:id
pub async fn pekerjaan_update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<PekerjaanRequest>, JsonRejection>,
) -> ApiResult<Pekerjaan> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let updated = state.pekerjaan.update(id, request).await?;
    Ok(ApiResponse::success(updated).with_message("Pekerjaan berhasil diperbarui"))
}

/// DELETE /api/pekerjaan/:id - Permanent delete (admin)
pub async fn pekerjaan_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    let message = state.pekerjaan.delete(id, &user).await?;
    Ok(ApiResponse::message(message))
}

/// PUT /api/pekerjaan/:id/soft-delete
pub async fn pekerjaan_soft_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Pekerjaan> {
    let Path(id) = id?;
    let (row, message) = state.pekerjaan.soft_delete(id, &user).await?;
    Ok(ApiResponse::success(row).with_message(message))
}

/// PUT /api/pekerjaan/:id/restore
pub async fn pekerjaan_restore(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Pekerjaan> {
    let Path(id) = id?;
    let (row, message) = state.pekerjaan.restore(id, &user).await?;
    Ok(ApiResponse::success(row).with_message(message))
}

/// DELETE /api/pekerjaan/:id/hard-delete - Only for trashed rows
pub async fn pekerjaan_hard_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    let message = state.pekerjaan.hard_delete(id, &user).await?;
    Ok(ApiResponse::message(message))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::auth::Role;
    use crate::testing::TestContext;

    fn job(alumni_id: i32, company: &str) -> Value {
        json!({
            "alumni_id": alumni_id,
            "nama_perusahaan": company,
            "posisi_jabatan": "Backend Engineer",
            "bidang_industri": "Teknologi",
            "lokasi_kerja": "Jakarta",
            "gaji_range": "10-15jt",
            "tanggal_mulai_kerja": "2023-02-01",
            "status_pekerjaan": "aktif"
        })
    }

    async fn create(ctx: &TestContext, token: &str, alumni_id: i32, company: &str) -> i64 {
        let (status, body) = ctx.post("/api/pekerjaan", Some(token), job(alumni_id, company)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn create_validates_dates_and_alumni_reference() {
        let ctx = TestContext::new();
        let (user, alumni) = ctx.alumni_user("andi", "1001");
        let token = ctx.token_for(&user);

        let mut bad_date = job(alumni.id, "PT Maju");
        bad_date["tanggal_mulai_kerja"] = json!("01/02/2023");
        let (status, _) = ctx.post("/api/pekerjaan", Some(&token), bad_date).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut reversed = job(alumni.id, "PT Maju");
        reversed["tanggal_selesai_kerja"] = json!("2022-12-31");
        let (status, _) = ctx.post("/api/pekerjaan", Some(&token), reversed).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = ctx.post("/api/pekerjaan", Some(&token), job(4242, "PT Maju")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "alumni_id tidak ditemukan");
    }

    #[tokio::test]
    async fn owner_trash_lifecycle() {
        let ctx = TestContext::new();
        let (user, alumni) = ctx.alumni_user("andi", "1001");
        let token = ctx.token_for(&user);
        let id = create(&ctx, &token, alumni.id, "PT Maju").await;

        // Hard delete only applies to trashed rows
        let (status, _) = ctx.delete(&format!("/api/pekerjaan/{}/hard-delete", id), Some(&token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = ctx.put(&format!("/api/pekerjaan/{}/soft-delete", id), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], format!("Soft delete pekerjaan id {} sukses", id));
        assert_eq!(body["data"]["is_deleted"], true);
        let first_deleted_at = body["data"]["deleted_at"].clone();
        assert!(!first_deleted_at.is_null());

        // Trashing again keeps the original timestamp
        let (_, body) = ctx.put(&format!("/api/pekerjaan/{}/soft-delete", id), Some(&token), None).await;
        assert_eq!(body["data"]["deleted_at"], first_deleted_at);

        let (_, live) = ctx.get("/api/pekerjaan", Some(&token)).await;
        assert!(live["data"].as_array().unwrap().is_empty());
        let (_, trashed) = ctx.get("/api/pekerjaan/trashed", Some(&token)).await;
        assert_eq!(trashed["data"][0]["id"], id);

        // Trashed rows cannot be edited
        let (status, _) = ctx
            .put(&format!("/api/pekerjaan/{}", id), Some(&token), Some(job(alumni.id, "PT Baru")))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = ctx.put(&format!("/api/pekerjaan/{}/restore", id), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["is_deleted"], false);
        assert!(body["data"]["deleted_at"].is_null());

        ctx.put(&format!("/api/pekerjaan/{}/soft-delete", id), Some(&token), None).await;
        let (status, body) = ctx.delete(&format!("/api/pekerjaan/{}/hard-delete", id), Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], format!("Hard delete pekerjaan id {} sukses", id));

        let (status, _) = ctx.delete(&format!("/api/pekerjaan/{}/hard-delete", id), Some(&token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = ctx.get(&format!("/api/pekerjaan/{}", id), Some(&token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn other_users_rows_behave_as_missing() {
        let ctx = TestContext::new();
        let (owner, alumni) = ctx.alumni_user("andi", "1001");
        let (stranger, _) = ctx.alumni_user("bayu", "1002");
        let owner_token = ctx.token_for(&owner);
        let stranger_token = ctx.token_for(&stranger);
        let id = create(&ctx, &owner_token, alumni.id, "PT Maju").await;

        let (status, _) = ctx
            .put(&format!("/api/pekerjaan/{}/soft-delete", id), Some(&stranger_token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        ctx.put(&format!("/api/pekerjaan/{}/soft-delete", id), Some(&owner_token), None).await;

        let (_, trashed) = ctx.get("/api/pekerjaan/trashed", Some(&stranger_token)).await;
        assert!(trashed["data"].as_array().unwrap().is_empty());

        let (status, _) = ctx
            .put(&format!("/api/pekerjaan/{}/restore", id), Some(&stranger_token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = ctx
            .delete(&format!("/api/pekerjaan/{}/hard-delete", id), Some(&stranger_token))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Admins see and manage every trashed row
        let admin = ctx.user("admin", Role::Admin);
        let admin_token = ctx.token_for(&admin);
        let (_, trashed) = ctx.get("/api/pekerjaan/trashed", Some(&admin_token)).await;
        assert_eq!(trashed["data"].as_array().unwrap().len(), 1);
        let (status, _) = ctx
            .put(&format!("/api/pekerjaan/{}/restore", id), Some(&admin_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn admin_permanent_delete_ignores_state() {
        let ctx = TestContext::new();
        let (user, alumni) = ctx.alumni_user("andi", "1001");
        let admin = ctx.user("admin", Role::Admin);
        let token = ctx.token_for(&user);
        let admin_token = ctx.token_for(&admin);
        let id = create(&ctx, &token, alumni.id, "PT Maju").await;

        let (status, body) = ctx.delete(&format!("/api/pekerjaan/{}", id), Some(&admin_token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], format!("Pekerjaan id {} berhasil dihapus", id));

        let (status, _) = ctx.delete(&format!("/api/pekerjaan/{}", id), Some(&admin_token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_page_excludes_trash() {
        let ctx = TestContext::new();
        let (user, alumni) = ctx.alumni_user("andi", "1001");
        let token = ctx.token_for(&user);
        let keep = create(&ctx, &token, alumni.id, "PT Satu").await;
        let gone = create(&ctx, &token, alumni.id, "PT Dua").await;
        ctx.put(&format!("/api/pekerjaan/{}/soft-delete", gone), Some(&token), None).await;

        let (status, body) = ctx.get("/api/pekerjaan/list?sortBy=nama_perusahaan&order=asc", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["id"], keep);

        let (_, by_alumni) = ctx.get(&format!("/api/pekerjaan/alumni/{}", alumni.id), Some(&token)).await;
        assert_eq!(by_alumni["data"].as_array().unwrap().len(), 1);
    }
}
