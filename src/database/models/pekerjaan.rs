use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Employment row in `pekerjaan_alumni`. `is_deleted` marks the trashed state.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Pekerjaan {
    pub id: i32,
    pub alumni_id: i32,
    pub nama_perusahaan: String,
    pub posisi_jabatan: String,
    pub bidang_industri: String,
    pub lokasi_kerja: String,
    pub gaji_range: String,
    pub tanggal_mulai_kerja: DateTime<Utc>,
    pub tanggal_selesai_kerja: Option<DateTime<Utc>>,
    pub status_pekerjaan: String,
    pub deskripsi_pekerjaan: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Validated, mutable business fields
#[derive(Debug, Clone)]
pub struct PekerjaanFields {
    pub nama_perusahaan: String,
    pub posisi_jabatan: String,
    pub bidang_industri: String,
    pub lokasi_kerja: String,
    pub gaji_range: String,
    pub tanggal_mulai_kerja: DateTime<Utc>,
    pub tanggal_selesai_kerja: Option<DateTime<Utc>>,
    pub status_pekerjaan: String,
    pub deskripsi_pekerjaan: String,
}

#[derive(Debug, Clone)]
pub struct NewPekerjaan {
    pub alumni_id: i32,
    pub fields: PekerjaanFields,
}
