use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::mongo::MongoStore;
use crate::database::postgres::PgStore;
use crate::database::{
    AlumniRepository, DatabaseManager, FileRepository, HealthCheck, PekerjaanDocRepository,
    PekerjaanRepository, UserRepository,
};
use crate::services::{AlumniService, AuthService, FileService, PekerjaanDocService, PekerjaanService};

/// Repository handles the services are built from
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub alumni: Arc<dyn AlumniRepository>,
    pub pekerjaan: Arc<dyn PekerjaanRepository>,
    pub pekerjaan_doc: Arc<dyn PekerjaanDocRepository>,
    pub files: Arc<dyn FileRepository>,
    pub health: Arc<dyn HealthCheck>,
}

impl Repositories {
    pub fn from_manager(db: &DatabaseManager) -> Self {
        let pg = Arc::new(PgStore::new(db.pg().clone()));
        let mongo = Arc::new(MongoStore::new(db.mongo().clone()));

        Self {
            users: pg.clone(),
            alumni: pg.clone(),
            pekerjaan: pg,
            pekerjaan_doc: mongo.clone(),
            files: mongo,
            health: Arc::new(db.clone()),
        }
    }
}

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub alumni: AlumniService,
    pub pekerjaan: PekerjaanService,
    pub pekerjaan_doc: PekerjaanDocService,
    pub files: FileService,
    pub health: Arc<dyn HealthCheck>,
}

impl AppState {
    pub fn new(config: AppConfig, repos: Repositories) -> Self {
        let config = Arc::new(config);
        let deadline = config.request_timeout();
        let max_page_limit = config.api.max_page_limit;

        Self {
            auth: AuthService::new(repos.users, config.clone()),
            alumni: AlumniService::new(repos.alumni, deadline, max_page_limit),
            pekerjaan: PekerjaanService::new(repos.pekerjaan, deadline, max_page_limit),
            pekerjaan_doc: PekerjaanDocService::new(repos.pekerjaan_doc, deadline),
            files: FileService::new(repos.files, config.api.upload_dir.clone(), deadline),
            health: repos.health,
            config,
        }
    }
}
