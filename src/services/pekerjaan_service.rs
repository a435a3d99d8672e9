use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use tracing::info;

use crate::database::models::{NewPekerjaan, Pekerjaan, PekerjaanFields};
use crate::database::{with_deadline, PekerjaanRepository};
use crate::error::ApiError;
use crate::filter::{PageMeta, PageQuery, PageRequest, PekerjaanSort, SortDirection};
use crate::middleware::AuthUser;

const NOT_FOUND: &str = "Pekerjaan tidak ditemukan";

pub const START_DATE_FIELD: &str = "tanggal_mulai_kerja";
pub const END_DATE_FIELD: &str = "tanggal_selesai_kerja";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePekerjaanRequest {
    pub alumni_id: i32,
    #[serde(flatten)]
    pub fields: PekerjaanRequest,
}

/// Business fields as sent by clients; dates are `YYYY-MM-DD` strings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PekerjaanRequest {
    pub nama_perusahaan: String,
    pub posisi_jabatan: String,
    pub bidang_industri: String,
    pub lokasi_kerja: String,
    pub gaji_range: String,
    pub tanggal_mulai_kerja: String,
    pub tanggal_selesai_kerja: Option<String>,
    pub status_pekerjaan: String,
    pub deskripsi_pekerjaan: String,
}

/// Parse a `YYYY-MM-DD` date into UTC midnight
pub fn parse_date(field: &str, value: &str) -> Result<DateTime<Utc>, ApiError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
        .ok_or_else(|| ApiError::bad_request(format!("Format {} harus YYYY-MM-DD", field)))
}

/// Optional date: absent or blank means none
pub fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_date(field, v).map(Some),
        None => Ok(None),
    }
}

pub fn check_date_order(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<(), ApiError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ApiError::bad_request(
                "tanggal_selesai_kerja tidak boleh sebelum tanggal_mulai_kerja",
            ));
        }
    }
    Ok(())
}

impl PekerjaanRequest {
    pub fn into_fields(self) -> Result<PekerjaanFields, ApiError> {
        let start = parse_date(START_DATE_FIELD, &self.tanggal_mulai_kerja)?;
        let end = parse_optional_date(END_DATE_FIELD, self.tanggal_selesai_kerja.as_deref())?;
        check_date_order(Some(start), end)?;

        Ok(PekerjaanFields {
            nama_perusahaan: self.nama_perusahaan,
            posisi_jabatan: self.posisi_jabatan,
            bidang_industri: self.bidang_industri,
            lokasi_kerja: self.lokasi_kerja,
            gaji_range: self.gaji_range,
            tanggal_mulai_kerja: start,
            tanggal_selesai_kerja: end,
            status_pekerjaan: self.status_pekerjaan,
            deskripsi_pekerjaan: self.deskripsi_pekerjaan,
        })
    }
}

/// Relational employment records: CRUD plus the trash lifecycle
#[derive(Clone)]
pub struct PekerjaanService {
    repo: Arc<dyn PekerjaanRepository>,
    deadline: Duration,
    max_page_limit: i64,
}

impl PekerjaanService {
    pub fn new(repo: Arc<dyn PekerjaanRepository>, deadline: Duration, max_page_limit: i64) -> Self {
        Self {
            repo,
            deadline,
            max_page_limit,
        }
    }

    pub async fn list(&self) -> Result<Vec<Pekerjaan>, ApiError> {
        Ok(with_deadline(self.deadline, self.repo.list_live()).await?)
    }

    pub async fn get(&self, id: i32) -> Result<Pekerjaan, ApiError> {
        with_deadline(self.deadline, self.repo.find(id))
            .await?
            .ok_or_else(|| ApiError::not_found(NOT_FOUND))
    }

    pub async fn list_by_alumni(&self, alumni_id: i32) -> Result<Vec<Pekerjaan>, ApiError> {
        Ok(with_deadline(self.deadline, self.repo.list_by_alumni(alumni_id)).await?)
    }

    /// Trashed rows visible to the caller
    pub async fn list_trashed(&self, caller: &AuthUser) -> Result<Vec<Pekerjaan>, ApiError> {
        Ok(with_deadline(self.deadline, self.repo.list_trashed(caller.scope())).await?)
    }

    pub async fn create(&self, request: CreatePekerjaanRequest) -> Result<Pekerjaan, ApiError> {
        let new = NewPekerjaan {
            alumni_id: request.alumni_id,
            fields: request.fields.into_fields()?,
        };
        let created = with_deadline(self.deadline, self.repo.create(&new)).await?;
        info!("Pekerjaan {} created for alumni {}", created.id, created.alumni_id);
        Ok(created)
    }

    pub async fn update(&self, id: i32, request: PekerjaanRequest) -> Result<Pekerjaan, ApiError> {
        let fields = request.into_fields()?;
        with_deadline(self.deadline, self.repo.update(id, &fields))
            .await?
            .ok_or_else(|| ApiError::not_found(NOT_FOUND))
    }

    /// Permanent removal in any state; admin routes only
    pub async fn delete(&self, id: i32, caller: &AuthUser) -> Result<String, ApiError> {
        if !with_deadline(self.deadline, self.repo.delete(id)).await? {
            return Err(ApiError::not_found(NOT_FOUND));
        }
        info!("Pekerjaan {} permanently deleted by admin {}", id, caller.user_id);
        Ok(format!("Pekerjaan id {} berhasil dihapus", id))
    }

    pub async fn soft_delete(&self, id: i32, caller: &AuthUser) -> Result<(Pekerjaan, String), ApiError> {
        let row = with_deadline(self.deadline, self.repo.soft_delete(id, caller.scope()))
            .await?
            .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
        info!("Pekerjaan {} moved to trash by user {}", id, caller.user_id);
        Ok((row, format!("Soft delete pekerjaan id {} sukses", id)))
    }

    pub async fn restore(&self, id: i32, caller: &AuthUser) -> Result<(Pekerjaan, String), ApiError> {
        let row = with_deadline(self.deadline, self.repo.restore(id, caller.scope()))
            .await?
            .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
        info!("Pekerjaan {} restored by user {}", id, caller.user_id);
        Ok((row, format!("Restore pekerjaan id {} sukses", id)))
    }

    /// Remove a trashed row. Live, missing and foreign rows are all `not_found`.
    pub async fn hard_delete(&self, id: i32, caller: &AuthUser) -> Result<String, ApiError> {
        if !with_deadline(self.deadline, self.repo.hard_delete(id, caller.scope())).await? {
            return Err(ApiError::not_found("Pekerjaan tidak ditemukan di trash"));
        }
        info!("Pekerjaan {} hard deleted by user {}", id, caller.user_id);
        Ok(format!("Hard delete pekerjaan id {} sukses", id))
    }

    pub async fn page(&self, query: &PageQuery) -> Result<(Vec<Pekerjaan>, PageMeta), ApiError> {
        let request = PageRequest::parse(
            query,
            PekerjaanSort::CreatedAt,
            SortDirection::Desc,
            self.max_page_limit,
        )
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

        let page = with_deadline(self.deadline, self.repo.page(&request)).await?;
        Ok((page.items, request.meta(page.total)))
    }
}
