use async_trait::async_trait;

use super::{classify, PgStore};
use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, User};
use crate::database::repository::UserRepository;

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at, updated_at";

#[async_trait]
impl UserRepository for PgStore {
    async fn find_by_login(&self, identifier: &str) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1 OR email = $1", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(identifier)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "username atau email sudah terdaftar", "referensi tidak valid"))
    }
}
