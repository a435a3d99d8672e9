use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::auth::password::{hash_password, DEFAULT_PASSWORD};
use crate::database::models::{Alumni, AlumniInput};
use crate::database::{with_deadline, AlumniRepository};
use crate::error::ApiError;
use crate::filter::{AlumniSort, PageMeta, PageQuery, PageRequest, SortDirection};

const NOT_FOUND: &str = "Alumni tidak ditemukan";

#[derive(Clone)]
pub struct AlumniService {
    repo: Arc<dyn AlumniRepository>,
    deadline: Duration,
    max_page_limit: i64,
}

impl AlumniService {
    pub fn new(repo: Arc<dyn AlumniRepository>, deadline: Duration, max_page_limit: i64) -> Self {
        Self {
            repo,
            deadline,
            max_page_limit,
        }
    }

    pub async fn list(&self) -> Result<Vec<Alumni>, ApiError> {
        Ok(with_deadline(self.deadline, self.repo.list()).await?)
    }

    pub async fn get(&self, id: i32) -> Result<Alumni, ApiError> {
        with_deadline(self.deadline, self.repo.find(id))
            .await?
            .ok_or_else(|| ApiError::not_found(NOT_FOUND))
    }

    /// Create the alumni together with its login account (username = nama)
    pub async fn create(&self, input: AlumniInput) -> Result<Alumni, ApiError> {
        validate(&input)?;

        let password_hash = hash_password(DEFAULT_PASSWORD).await?;
        let alumni = with_deadline(self.deadline, self.repo.create_with_user(&input, &password_hash)).await?;

        warn!(
            "Alumni {} created with default password for user {}; ask them to change it",
            alumni.id, alumni.user_id
        );
        Ok(alumni)
    }

    pub async fn update(&self, id: i32, input: AlumniInput) -> Result<Alumni, ApiError> {
        validate(&input)?;

        with_deadline(self.deadline, self.repo.update(id, &input))
            .await?
            .ok_or_else(|| ApiError::not_found(NOT_FOUND))
    }

    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        if !with_deadline(self.deadline, self.repo.delete(id)).await? {
            return Err(ApiError::not_found(NOT_FOUND));
        }
        info!("Alumni {} deleted", id);
        Ok(())
    }

    pub async fn set_status_kematian(&self, id: i32, status: bool) -> Result<Alumni, ApiError> {
        with_deadline(self.deadline, self.repo.set_status_kematian(id, status))
            .await?
            .ok_or_else(|| ApiError::not_found(NOT_FOUND))
    }

    pub async fn page(&self, query: &PageQuery) -> Result<(Vec<Alumni>, PageMeta), ApiError> {
        let request = PageRequest::parse(query, AlumniSort::Id, SortDirection::Asc, self.max_page_limit)
            .map_err(|e| ApiError::bad_request(e.to_string()))?;

        let page = with_deadline(self.deadline, self.repo.page(&request)).await?;
        Ok((page.items, request.meta(page.total)))
    }
}

fn validate(input: &AlumniInput) -> Result<(), ApiError> {
    if input.nim.trim().is_empty() || input.nama.trim().is_empty() || input.email.trim().is_empty() {
        return Err(ApiError::bad_request("nim, nama dan email wajib diisi"));
    }
    Ok(())
}
