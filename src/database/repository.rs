//! Storage seams. Services talk to these traits; `postgres` and `mongo`
//! provide the production implementations.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::auth::OwnerScope;
use crate::database::manager::DatabaseError;
use crate::database::models::{
    Alumni, AlumniInput, FileRecord, NewFile, NewPekerjaan, NewUser, Pekerjaan, PekerjaanDoc,
    PekerjaanDocPatch, PekerjaanFields, User,
};
use crate::filter::{AlumniSort, Page, PageRequest, PekerjaanSort};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Users whose username or email equals `identifier` (case-sensitive)
    async fn find_by_login(&self, identifier: &str) -> Result<Vec<User>, DatabaseError>;

    async fn create(&self, user: NewUser) -> Result<User, DatabaseError>;
}

#[async_trait]
pub trait AlumniRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Alumni>, DatabaseError>;

    async fn find(&self, id: i32) -> Result<Option<Alumni>, DatabaseError>;

    /// Insert the backing user and the alumni row atomically
    async fn create_with_user(&self, input: &AlumniInput, password_hash: &str) -> Result<Alumni, DatabaseError>;

    async fn update(&self, id: i32, input: &AlumniInput) -> Result<Option<Alumni>, DatabaseError>;

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError>;

    async fn set_status_kematian(&self, id: i32, status: bool) -> Result<Option<Alumni>, DatabaseError>;

    async fn page(&self, request: &PageRequest<AlumniSort>) -> Result<Page<Alumni>, DatabaseError>;
}

/// Relational employment records and their trash lifecycle.
///
/// Lifecycle calls take an [`OwnerScope`]; a row outside the scope behaves
/// exactly like a missing row.
#[async_trait]
pub trait PekerjaanRepository: Send + Sync {
    async fn list_live(&self) -> Result<Vec<Pekerjaan>, DatabaseError>;

    /// Any state, unscoped
    async fn find(&self, id: i32) -> Result<Option<Pekerjaan>, DatabaseError>;

    async fn list_by_alumni(&self, alumni_id: i32) -> Result<Vec<Pekerjaan>, DatabaseError>;

    async fn list_trashed(&self, scope: OwnerScope) -> Result<Vec<Pekerjaan>, DatabaseError>;

    async fn create(&self, new: &NewPekerjaan) -> Result<Pekerjaan, DatabaseError>;

    /// Replace the business fields of a live row
    async fn update(&self, id: i32, fields: &PekerjaanFields) -> Result<Option<Pekerjaan>, DatabaseError>;

    /// Unconditional removal regardless of state
    async fn delete(&self, id: i32) -> Result<bool, DatabaseError>;

    async fn soft_delete(&self, id: i32, scope: OwnerScope) -> Result<Option<Pekerjaan>, DatabaseError>;

    async fn restore(&self, id: i32, scope: OwnerScope) -> Result<Option<Pekerjaan>, DatabaseError>;

    /// Remove a trashed row; live rows are left alone
    async fn hard_delete(&self, id: i32, scope: OwnerScope) -> Result<bool, DatabaseError>;

    async fn page(&self, request: &PageRequest<PekerjaanSort>) -> Result<Page<Pekerjaan>, DatabaseError>;
}

#[async_trait]
pub trait PekerjaanDocRepository: Send + Sync {
    async fn list_live(&self) -> Result<Vec<PekerjaanDoc>, DatabaseError>;

    async fn find(&self, id: ObjectId) -> Result<Option<PekerjaanDoc>, DatabaseError>;

    async fn list_by_alumni(&self, alumni_id: i32) -> Result<Vec<PekerjaanDoc>, DatabaseError>;

    async fn list_trashed(&self) -> Result<Vec<PekerjaanDoc>, DatabaseError>;

    async fn create(&self, doc: PekerjaanDoc) -> Result<PekerjaanDoc, DatabaseError>;

    async fn update(&self, id: ObjectId, patch: &PekerjaanDocPatch) -> Result<Option<PekerjaanDoc>, DatabaseError>;

    async fn set_deleted(&self, id: ObjectId, deleted: bool) -> Result<Option<PekerjaanDoc>, DatabaseError>;

    async fn delete(&self, id: ObjectId) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn insert(&self, file: NewFile) -> Result<FileRecord, DatabaseError>;

    /// Records not pending deletion; `owner = None` lists everyone's
    async fn list(&self, owner: Option<i32>) -> Result<Vec<FileRecord>, DatabaseError>;

    async fn find(&self, id: ObjectId) -> Result<Option<FileRecord>, DatabaseError>;

    /// First phase of a delete: flag the record so listings hide it
    async fn mark_pending_delete(&self, id: ObjectId) -> Result<bool, DatabaseError>;

    /// Final phase, filtered by owner when one is given
    async fn delete(&self, id: ObjectId, owner: Option<i32>) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;
}
