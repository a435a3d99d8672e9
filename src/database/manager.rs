use std::future::Future;
use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;
use crate::database::repository::HealthCheck;

/// Errors from the datastore layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Datastore call exceeded {0}s")]
    Timeout(u64),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

/// Run a datastore future under a deadline, mapping expiry to `Timeout`
pub async fn with_deadline<T, F>(deadline: Duration, fut: F) -> Result<T, DatabaseError>
where
    F: Future<Output = Result<T, DatabaseError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(DatabaseError::Timeout(deadline.as_secs())),
    }
}

/// Process-wide handles to both stores
#[derive(Clone)]
pub struct DatabaseManager {
    pg: PgPool,
    mongo: mongodb::Database,
}

impl DatabaseManager {
    /// Build both clients. Connections are opened lazily on first use so the
    /// process can start (and report 503 on /health) while a store is down.
    pub async fn connect(config: &AppConfig) -> Result<Self, DatabaseError> {
        if config.database.url.is_empty() {
            return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
        }
        if config.mongo.uri.is_empty() {
            return Err(DatabaseError::ConfigMissing("MONGODB_URI"));
        }

        let connect_timeout = Duration::from_secs(config.database.connection_timeout);

        let pg = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(connect_timeout)
            .connect_lazy(&config.database.url)?;

        let mut options = ClientOptions::parse(&config.mongo.uri).await?;
        options.app_name = Some("alumni-api".to_string());
        options.server_selection_timeout = Some(connect_timeout);
        options.connect_timeout = Some(connect_timeout);
        let client = mongodb::Client::with_options(options)?;
        let mongo = client.database(&config.mongo.database);

        info!(
            "Datastores configured (postgres pool max {}, mongo database '{}')",
            config.database.max_connections, config.mongo.database
        );

        Ok(Self { pg, mongo })
    }

    pub fn pg(&self) -> &PgPool {
        &self.pg
    }

    pub fn mongo(&self) -> &mongodb::Database {
        &self.mongo
    }

    /// Pings both stores
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pg).await?;
        self.mongo.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    /// Close the relational pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pg.close().await;
        info!("Closed database pool");
    }
}

#[async_trait::async_trait]
impl HealthCheck for DatabaseManager {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.health_check().await
    }
}
