use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tracing::warn;

use super::{classify, PgStore};
use crate::auth::Role;
use crate::database::manager::DatabaseError;
use crate::database::models::{Alumni, AlumniInput};
use crate::database::repository::AlumniRepository;
use crate::filter::{AlumniSort, Page, PageRequest};

const ALUMNI_COLUMNS: &str = "a.id, a.user_id, a.nim, a.nama, a.jurusan, a.angkatan, a.tahun_lulus, \
     a.email, a.no_telepon, a.alamat, a.status_kematian, a.created_at, a.updated_at";

const SEARCH_PREDICATE: &str =
    "($1::text IS NULL OR a.nama ILIKE $1 OR a.email ILIKE $1 OR a.jurusan ILIKE $1)";

const CONFLICT: &str = "NIM, username atau email sudah terdaftar";

fn classify_alumni(err: sqlx::Error) -> DatabaseError {
    classify(err, CONFLICT, "user_id tidak valid")
}

impl PgStore {
    async fn insert_alumni_with_user(
        tx: &mut Transaction<'_, Postgres>,
        input: &AlumniInput,
        password_hash: &str,
    ) -> Result<Alumni, sqlx::Error> {
        let user_id: i32 = sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) RETURNING id",
        )
        .bind(&input.nama)
        .bind(&input.email)
        .bind(password_hash)
        .bind(Role::User.as_str())
        .fetch_one(&mut **tx)
        .await?;

        let sql = format!(
            "INSERT INTO alumni AS a (user_id, nim, nama, jurusan, angkatan, tahun_lulus, email, \
             no_telepon, alamat, status_kematian, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW()) RETURNING {}",
            ALUMNI_COLUMNS
        );
        sqlx::query_as::<_, Alumni>(&sql)
            .bind(user_id)
            .bind(&input.nim)
            .bind(&input.nama)
            .bind(&input.jurusan)
            .bind(input.angkatan)
            .bind(input.tahun_lulus)
            .bind(&input.email)
            .bind(&input.no_telepon)
            .bind(&input.alamat)
            .bind(input.status_kematian)
            .fetch_one(&mut **tx)
            .await
    }
}

#[async_trait]
impl AlumniRepository for PgStore {
    async fn list(&self) -> Result<Vec<Alumni>, DatabaseError> {
        let sql = format!("SELECT {} FROM alumni a ORDER BY a.created_at DESC", ALUMNI_COLUMNS);
        Ok(sqlx::query_as::<_, Alumni>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find(&self, id: i32) -> Result<Option<Alumni>, DatabaseError> {
        let sql = format!("SELECT {} FROM alumni a WHERE a.id = $1", ALUMNI_COLUMNS);
        Ok(sqlx::query_as::<_, Alumni>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_with_user(&self, input: &AlumniInput, password_hash: &str) -> Result<Alumni, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        match Self::insert_alumni_with_user(&mut tx, input, password_hash).await {
            Ok(alumni) => {
                tx.commit().await.map_err(classify_alumni)?;
                Ok(alumni)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback of alumni create failed: {}", rollback_err);
                }
                Err(classify_alumni(e))
            }
        }
    }

    async fn update(&self, id: i32, input: &AlumniInput) -> Result<Option<Alumni>, DatabaseError> {
        let sql = format!(
            "UPDATE alumni a SET nim = $2, nama = $3, jurusan = $4, angkatan = $5, tahun_lulus = $6, \
             email = $7, no_telepon = $8, alamat = $9, status_kematian = $10, updated_at = NOW() \
             WHERE a.id = $1 RETURNING {}",
            ALUMNI_COLUMNS
        );
        sqlx::query_as::<_, Alumni>(&sql)
            .bind(id)
            .bind(&input.nim)
            .bind(&input.nama)
            .bind(&input.jurusan)
            .bind(input.angkatan)
            .bind(input.tahun_lulus)
            .bind(&input.email)
            .bind(&input.no_telepon)
            .bind(&input.alamat)
            .bind(input.status_kematian)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify_alumni)
    }

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM alumni WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, CONFLICT, "alumni masih direferensikan data pekerjaan"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_status_kematian(&self, id: i32, status: bool) -> Result<Option<Alumni>, DatabaseError> {
        let sql = format!(
            "UPDATE alumni a SET status_kematian = $2, updated_at = NOW() WHERE a.id = $1 RETURNING {}",
            ALUMNI_COLUMNS
        );
        Ok(sqlx::query_as::<_, Alumni>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn page(&self, request: &PageRequest<AlumniSort>) -> Result<Page<Alumni>, DatabaseError> {
        let pattern = request.search_pattern();

        let sql = format!(
            "SELECT {} FROM alumni a WHERE {} {} LIMIT $2 OFFSET $3",
            ALUMNI_COLUMNS,
            SEARCH_PREDICATE,
            request.order_by()
        );
        let items = sqlx::query_as::<_, Alumni>(&sql)
            .bind(&pattern)
            .bind(request.limit)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM alumni a WHERE {}", SEARCH_PREDICATE);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        Ok(Page { items, total })
    }
}
