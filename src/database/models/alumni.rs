use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Alumni {
    pub id: i32,
    pub user_id: i32,
    pub nim: String,
    pub nama: String,
    pub jurusan: String,
    pub angkatan: i32,
    pub tahun_lulus: i32,
    pub email: String,
    pub no_telepon: String,
    pub alamat: String,
    pub status_kematian: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Business fields accepted on create and full-replacement update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AlumniInput {
    pub nim: String,
    pub nama: String,
    pub jurusan: String,
    pub angkatan: i32,
    pub tahun_lulus: i32,
    pub email: String,
    pub no_telepon: String,
    pub alamat: String,
    pub status_kematian: bool,
}
