use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use mongodb::bson::{self, oid::ObjectId};
use serde::Deserialize;
use tracing::info;

use super::pekerjaan_service::{check_date_order, parse_optional_date, END_DATE_FIELD, START_DATE_FIELD};
use crate::database::models::{PekerjaanDoc, PekerjaanDocPatch, PekerjaanDocView};
use crate::database::{with_deadline, PekerjaanDocRepository};
use crate::error::ApiError;

const NOT_FOUND: &str = "Data pekerjaan tidak ditemukan";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePekerjaanDocRequest {
    pub alumni_id: i32,
    pub nama_perusahaan: String,
    pub posisi_jabatan: String,
    pub bidang_industri: String,
    pub lokasi_kerja: String,
    pub gaji_range: String,
    pub tanggal_mulai_kerja: Option<String>,
    pub tanggal_selesai_kerja: Option<String>,
    pub status_pekerjaan: String,
    pub deskripsi_pekerjaan: String,
}

/// Partial update body; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdatePekerjaanDocRequest {
    pub nama_perusahaan: Option<String>,
    pub posisi_jabatan: Option<String>,
    pub bidang_industri: Option<String>,
    pub lokasi_kerja: Option<String>,
    pub gaji_range: Option<String>,
    pub tanggal_mulai_kerja: Option<String>,
    pub tanggal_selesai_kerja: Option<String>,
    pub status_pekerjaan: Option<String>,
    pub deskripsi_pekerjaan: Option<String>,
}

impl UpdatePekerjaanDocRequest {
    fn into_patch(self) -> Result<PekerjaanDocPatch, ApiError> {
        // A provided but blank date clears the stored one
        let start = match self.tanggal_mulai_kerja.as_deref() {
            Some(raw) => Some(parse_optional_date(START_DATE_FIELD, Some(raw))?),
            None => None,
        };
        let end = match self.tanggal_selesai_kerja.as_deref() {
            Some(raw) => Some(parse_optional_date(END_DATE_FIELD, Some(raw))?),
            None => None,
        };
        check_date_order(start.flatten(), end.flatten())?;

        Ok(PekerjaanDocPatch {
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

pub fn parse_object_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| ApiError::bad_request("ID tidak valid"))
}

/// Employment records kept in the document store
#[derive(Clone)]
pub struct PekerjaanDocService {
    repo: Arc<dyn PekerjaanDocRepository>,
    deadline: Duration,
}

impl PekerjaanDocService {
    pub fn new(repo: Arc<dyn PekerjaanDocRepository>, deadline: Duration) -> Self {
        Self { repo, deadline }
    }

    pub async fn list(&self) -> Result<Vec<PekerjaanDocView>, ApiError> {
        let docs = with_deadline(self.deadline, self.repo.list_live()).await?;
        Ok(docs.into_iter().map(PekerjaanDocView::from).collect())
    }

    pub async fn get(&self, id: &str) -> Result<PekerjaanDocView, ApiError> {
        let id = parse_object_id(id)?;
        with_deadline(self.deadline, self.repo.find(id))
            .await?
            .map(PekerjaanDocView::from)
            .ok_or_else(|| ApiError::not_found(NOT_FOUND))
    }

    pub async fn list_by_alumni(&self, alumni_id: i32) -> Result<Vec<PekerjaanDocView>, ApiError> {
        let docs = with_deadline(self.deadline, self.repo.list_by_alumni(alumni_id)).await?;
        Ok(docs.into_iter().map(PekerjaanDocView::from).collect())
    }

    pub async fn list_trashed(&self) -> Result<Vec<PekerjaanDocView>, ApiError> {
        let docs = with_deadline(self.deadline, self.repo.list_trashed()).await?;
        Ok(docs.into_iter().map(PekerjaanDocView::from).collect())
    }

    pub async fn create(&self, request: CreatePekerjaanDocRequest) -> Result<PekerjaanDocView, ApiError> {
        let start = parse_optional_date(START_DATE_FIELD, request.tanggal_mulai_kerja.as_deref())?;
        let end = parse_optional_date(END_DATE_FIELD, request.tanggal_selesai_kerja.as_deref())?;
        check_date_order(start, end)?;

        let now = Utc::now();
        let document = PekerjaanDoc {
            id: None,
            alumni_id: request.alumni_id,
            nama_perusahaan: request.nama_perusahaan,
            posisi_jabatan: request.posisi_jabatan,
            bidang_industri: request.bidang_industri,
            lokasi_kerja: request.lokasi_kerja,
            gaji_range: request.gaji_range,
            tanggal_mulai_kerja: start.map(bson::DateTime::from_chrono),
            tanggal_selesai_kerja: end.map(bson::DateTime::from_chrono),
            status_pekerjaan: request.status_pekerjaan,
            deskripsi_pekerjaan: request.deskripsi_pekerjaan,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        };

        let created = with_deadline(self.deadline, self.repo.create(document)).await?;
        let view = PekerjaanDocView::from(created);
        info!("Pekerjaan document {} created for alumni {}", view.id, view.alumni_id);
        Ok(view)
    }

    pub async fn update(&self, id: &str, request: UpdatePekerjaanDocRequest) -> Result<PekerjaanDocView, ApiError> {
        let id = parse_object_id(id)?;
        let patch = request.into_patch()?;

        // A single patched date must still be ordered against the stored one
        if patch.tanggal_mulai_kerja.is_some() != patch.tanggal_selesai_kerja.is_some() {
            let stored = with_deadline(self.deadline, self.repo.find(id))
                .await?
                .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
            let start = patch
                .tanggal_mulai_kerja
                .unwrap_or_else(|| stored.tanggal_mulai_kerja.map(|d| d.to_chrono()));
            let end = patch
                .tanggal_selesai_kerja
                .unwrap_or_else(|| stored.tanggal_selesai_kerja.map(|d| d.to_chrono()));
            check_date_order(start, end)?;
        }

        with_deadline(self.deadline, self.repo.update(id, &patch))
            .await?
            .map(PekerjaanDocView::from)
            .ok_or_else(|| ApiError::not_found(NOT_FOUND))
    }

    pub async fn soft_delete(&self, id: &str) -> Result<PekerjaanDocView, ApiError> {
        self.set_deleted(id, true).await
    }

    pub async fn restore(&self, id: &str) -> Result<PekerjaanDocView, ApiError> {
        self.set_deleted(id, false).await
    }

    async fn set_deleted(&self, id: &str, deleted: bool) -> Result<PekerjaanDocView, ApiError> {
        let id = parse_object_id(id)?;
        with_deadline(self.deadline, self.repo.set_deleted(id, deleted))
            .await?
            .map(PekerjaanDocView::from)
            .ok_or_else(|| ApiError::not_found(NOT_FOUND))
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let oid = parse_object_id(id)?;
        if !with_deadline(self.deadline, self.repo.delete(oid)).await? {
            return Err(ApiError::not_found(NOT_FOUND));
        }
        info!("Pekerjaan document {} deleted", id);
        Ok(())
    }
}
