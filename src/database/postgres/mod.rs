// Relational repositories (users, alumni, pekerjaan_alumni)
mod alumni;
mod pekerjaan;
mod users;

use sqlx::PgPool;

use crate::database::manager::DatabaseError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Classify constraint violations; everything else stays a driver error
fn classify(err: sqlx::Error, conflict: &str, invalid_reference: &str) -> DatabaseError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return DatabaseError::Conflict(conflict.to_string()),
            Some(FOREIGN_KEY_VIOLATION) => {
                return DatabaseError::InvalidReference(invalid_reference.to_string())
            }
            _ => {}
        }
    }
    DatabaseError::Sqlx(err)
}
