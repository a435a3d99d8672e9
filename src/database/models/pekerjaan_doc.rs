use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Employment document in the `pekerjaan_alumni` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PekerjaanDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub alumni_id: i32,
    #[serde(default)]
    pub nama_perusahaan: String,
    #[serde(default)]
    pub posisi_jabatan: String,
    #[serde(default)]
    pub bidang_industri: String,
    #[serde(default)]
    pub lokasi_kerja: String,
    #[serde(default)]
    pub gaji_range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tanggal_mulai_kerja: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tanggal_selesai_kerja: Option<bson::DateTime>,
    #[serde(default)]
    pub status_pekerjaan: String,
    #[serde(default)]
    pub deskripsi_pekerjaan: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_deleted: bool,
}

/// Partial update. `None` leaves a field untouched; for the dates,
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct PekerjaanDocPatch {
    pub nama_perusahaan: Option<String>,
    pub posisi_jabatan: Option<String>,
    pub bidang_industri: Option<String>,
    pub lokasi_kerja: Option<String>,
    pub gaji_range: Option<String>,
    pub tanggal_mulai_kerja: Option<Option<DateTime<Utc>>>,
    pub tanggal_selesai_kerja: Option<Option<DateTime<Utc>>>,
    pub status_pekerjaan: Option<String>,
    pub deskripsi_pekerjaan: Option<String>,
}

impl PekerjaanDocPatch {
    pub fn apply_to(&self, doc: &mut PekerjaanDoc, now: DateTime<Utc>) {
        let text_fields = [
            (&self.nama_perusahaan, &mut doc.nama_perusahaan),
            (&self.posisi_jabatan, &mut doc.posisi_jabatan),
            (&self.bidang_industri, &mut doc.bidang_industri),
            (&self.lokasi_kerja, &mut doc.lokasi_kerja),
            (&self.gaji_range, &mut doc.gaji_range),
            (&self.status_pekerjaan, &mut doc.status_pekerjaan),
            (&self.deskripsi_pekerjaan, &mut doc.deskripsi_pekerjaan),
        ];
        for (patch, target) in text_fields {
            if let Some(value) = patch {
                *target = value.clone();
            }
        }
        if let Some(date) = self.tanggal_mulai_kerja {
            doc.tanggal_mulai_kerja = date.map(bson::DateTime::from_chrono);
        }
        if let Some(date) = self.tanggal_selesai_kerja {
            doc.tanggal_selesai_kerja = date.map(bson::DateTime::from_chrono);
        }
        doc.updated_at = now;
    }
}

/// JSON shape with the ObjectId rendered as hex
#[derive(Debug, Clone, Serialize)]
pub struct PekerjaanDocView {
    pub id: String,
    pub alumni_id: i32,
    pub nama_perusahaan: String,
    pub posisi_jabatan: String,
    pub bidang_industri: String,
    pub lokasi_kerja: String,
    pub gaji_range: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tanggal_mulai_kerja: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tanggal_selesai_kerja: Option<DateTime<Utc>>,
    pub status_pekerjaan: String,
    pub deskripsi_pekerjaan: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
}

impl From<PekerjaanDoc> for PekerjaanDocView {
    fn from(doc: PekerjaanDoc) -> Self {
        Self {
            id: doc.id.map(|id| id.to_hex()).unwrap_or_default(),
            alumni_id: doc.alumni_id,
            nama_perusahaan: doc.nama_perusahaan,
            posisi_jabatan: doc.posisi_jabatan,
            bidang_industri: doc.bidang_industri,
            lokasi_kerja: doc.lokasi_kerja,
            gaji_range: doc.gaji_range,
            tanggal_mulai_kerja: doc.tanggal_mulai_kerja.map(|d| d.to_chrono()),
            tanggal_selesai_kerja: doc.tanggal_selesai_kerja.map(|d| d.to_chrono()),
            status_pekerjaan: doc.status_pekerjaan,
            deskripsi_pekerjaan: doc.deskripsi_pekerjaan,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
            is_deleted: doc.is_deleted,
        }
    }
}
