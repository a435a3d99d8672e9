// Document repositories (files, pekerjaan_alumni)
mod files;
mod pekerjaan;

use mongodb::{Collection, Database};

use crate::database::models::{FileRecord, PekerjaanDoc};

pub const FILES_COLLECTION: &str = "files";
pub const PEKERJAAN_COLLECTION: &str = "pekerjaan_alumni";

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn files(&self) -> Collection<FileRecord> {
        self.db.collection(FILES_COLLECTION)
    }

    fn pekerjaan(&self) -> Collection<PekerjaanDoc> {
        self.db.collection(PEKERJAAN_COLLECTION)
    }
}
