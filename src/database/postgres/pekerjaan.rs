use async_trait::async_trait;

use super::{classify, PgStore};
use crate::auth::OwnerScope;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewPekerjaan, Pekerjaan, PekerjaanFields};
use crate::database::repository::PekerjaanRepository;
use crate::filter::{Page, PageRequest, PekerjaanSort};

const PEKERJAAN_COLUMNS: &str = "p.id, p.alumni_id, p.nama_perusahaan, p.posisi_jabatan, \
     p.bidang_industri, p.lokasi_kerja, p.gaji_range, p.tanggal_mulai_kerja, \
     p.tanggal_selesai_kerja, p.status_pekerjaan, p.deskripsi_pekerjaan, p.created_at, \
     p.updated_at, p.is_deleted, p.deleted_at";

/// Ownership predicate over bind slot `$slot`; a NULL owner means unrestricted
fn owned_by(slot: u8) -> String {
    format!(
        "(${0}::int IS NULL OR EXISTS \
         (SELECT 1 FROM alumni a WHERE a.id = p.alumni_id AND a.user_id = ${0}))",
        slot
    )
}

const SEARCH_PREDICATE: &str = "($1::text IS NULL OR p.nama_perusahaan ILIKE $1 \
     OR p.posisi_jabatan ILIKE $1 OR p.bidang_industri ILIKE $1 OR p.lokasi_kerja ILIKE $1)";

fn classify_pekerjaan(err: sqlx::Error) -> DatabaseError {
    classify(err, "data pekerjaan sudah ada", "alumni_id tidak ditemukan")
}

#[async_trait]
impl PekerjaanRepository for PgStore {
    async fn list_live(&self) -> Result<Vec<Pekerjaan>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM pekerjaan_alumni p WHERE NOT p.is_deleted ORDER BY p.created_at DESC",
            PEKERJAAN_COLUMNS
        );
        Ok(sqlx::query_as::<_, Pekerjaan>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find(&self, id: i32) -> Result<Option<Pekerjaan>, DatabaseError> {
        let sql = format!("SELECT {} FROM pekerjaan_alumni p WHERE p.id = $1", PEKERJAAN_COLUMNS);
        Ok(sqlx::query_as::<_, Pekerjaan>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_by_alumni(&self, alumni_id: i32) -> Result<Vec<Pekerjaan>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM pekerjaan_alumni p WHERE p.alumni_id = $1 AND NOT p.is_deleted \
             ORDER BY p.tanggal_mulai_kerja DESC",
            PEKERJAAN_COLUMNS
        );
        Ok(sqlx::query_as::<_, Pekerjaan>(&sql)
            .bind(alumni_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_trashed(&self, scope: OwnerScope) -> Result<Vec<Pekerjaan>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM pekerjaan_alumni p WHERE p.is_deleted AND {} \
             ORDER BY p.deleted_at DESC NULLS LAST",
            PEKERJAAN_COLUMNS,
            owned_by(1)
        );
        Ok(sqlx::query_as::<_, Pekerjaan>(&sql)
            .bind(scope.owner_id())
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create(&self, new: &NewPekerjaan) -> Result<Pekerjaan, DatabaseError> {
        let f = &new.fields;
        let sql = format!(
            "INSERT INTO pekerjaan_alumni AS p (alumni_id, nama_perusahaan, posisi_jabatan, \
             bidang_industri, lokasi_kerja, gaji_range, tanggal_mulai_kerja, tanggal_selesai_kerja, \
             status_pekerjaan, deskripsi_pekerjaan, created_at, updated_at, is_deleted) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW(), FALSE) RETURNING {}",
            PEKERJAAN_COLUMNS
        );
        sqlx::query_as::<_, Pekerjaan>(&sql)
            .bind(new.alumni_id)
            .bind(&f.nama_perusahaan)
            .bind(&f.posisi_jabatan)
            .bind(&f.bidang_industri)
            .bind(&f.lokasi_kerja)
            .bind(&f.gaji_range)
            .bind(f.tanggal_mulai_kerja)
            .bind(f.tanggal_selesai_kerja)
            .bind(&f.status_pekerjaan)
            .bind(&f.deskripsi_pekerjaan)
            .fetch_one(&self.pool)
            .await
            .map_err(classify_pekerjaan)
    }

    async fn update(&self, id: i32, f: &PekerjaanFields) -> Result<Option<Pekerjaan>, DatabaseError> {
        let sql = format!(
            "UPDATE pekerjaan_alumni p SET nama_perusahaan = $2, posisi_jabatan = $3, \
             bidang_industri = $4, lokasi_kerja = $5, gaji_range = $6, tanggal_mulai_kerja = $7, \
             tanggal_selesai_kerja = $8, status_pekerjaan = $9, deskripsi_pekerjaan = $10, \
             updated_at = NOW() WHERE p.id = $1 AND NOT p.is_deleted RETURNING {}",
            PEKERJAAN_COLUMNS
        );
        sqlx::query_as::<_, Pekerjaan>(&sql)
            .bind(id)
            .bind(&f.nama_perusahaan)
            .bind(&f.posisi_jabatan)
            .bind(&f.bidang_industri)
            .bind(&f.lokasi_kerja)
            .bind(&f.gaji_range)
            .bind(f.tanggal_mulai_kerja)
            .bind(f.tanggal_selesai_kerja)
            .bind(&f.status_pekerjaan)
            .bind(&f.deskripsi_pekerjaan)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify_pekerjaan)
    }

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM pekerjaan_alumni WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, id: i32, scope: OwnerScope) -> Result<Option<Pekerjaan>, DatabaseError> {
        let sql = format!(
            "UPDATE pekerjaan_alumni p SET is_deleted = TRUE, \
             deleted_at = COALESCE(p.deleted_at, NOW()), updated_at = NOW() \
             WHERE p.id = $1 AND {} RETURNING {}",
            owned_by(2),
            PEKERJAAN_COLUMNS
        );
        Ok(sqlx::query_as::<_, Pekerjaan>(&sql)
            .bind(id)
            .bind(scope.owner_id())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn restore(&self, id: i32, scope: OwnerScope) -> Result<Option<Pekerjaan>, DatabaseError> {
        let sql = format!(
            "UPDATE pekerjaan_alumni p SET is_deleted = FALSE, deleted_at = NULL, updated_at = NOW() \
             WHERE p.id = $1 AND {} RETURNING {}",
            owned_by(2),
            PEKERJAAN_COLUMNS
        );
        Ok(sqlx::query_as::<_, Pekerjaan>(&sql)
            .bind(id)
            .bind(scope.owner_id())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn hard_delete(&self, id: i32, scope: OwnerScope) -> Result<bool, DatabaseError> {
        let sql = format!(
            "DELETE FROM pekerjaan_alumni p WHERE p.id = $1 AND p.is_deleted AND {}",
            owned_by(2)
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(scope.owner_id())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn page(&self, request: &PageRequest<PekerjaanSort>) -> Result<Page<Pekerjaan>, DatabaseError> {
        let pattern = request.search_pattern();

        let sql = format!(
            "SELECT {} FROM pekerjaan_alumni p WHERE NOT p.is_deleted AND {} {} LIMIT $2 OFFSET $3",
            PEKERJAAN_COLUMNS,
            SEARCH_PREDICATE,
            request.order_by()
        );
        let items = sqlx::query_as::<_, Pekerjaan>(&sql)
            .bind(&pattern)
            .bind(request.limit)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!(
            "SELECT COUNT(*) FROM pekerjaan_alumni p WHERE NOT p.is_deleted AND {}",
            SEARCH_PREDICATE
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        Ok(Page { items, total })
    }
}
