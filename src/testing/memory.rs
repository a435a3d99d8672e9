//! In-memory implementation of every repository trait, mirroring the
//! constraint and scoping behaviour of the SQL and document stores closely
//! enough for router-level tests.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::{self, oid::ObjectId};

use crate::auth::{OwnerScope, Role};
use crate::database::models::{
    Alumni, AlumniInput, FileRecord, NewFile, NewPekerjaan, NewUser, Pekerjaan, PekerjaanDoc,
    PekerjaanDocPatch, PekerjaanFields, User,
};
use crate::database::{
    AlumniRepository, DatabaseError, FileRepository, HealthCheck, PekerjaanDocRepository,
    PekerjaanRepository, UserRepository,
};
use crate::filter::{AlumniSort, Page, PageRequest, PekerjaanSort, SortDirection};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    alumni: Vec<Alumni>,
    pekerjaan: Vec<Pekerjaan>,
    docs: Vec<PekerjaanDoc>,
    files: Vec<FileRecord>,
    next_user_id: i32,
    next_alumni_id: i32,
    next_pekerjaan_id: i32,
}

impl Tables {
    fn insert_user(&mut self, user: NewUser) -> Result<User, DatabaseError> {
        if self
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(DatabaseError::Conflict("username atau email sudah terdaftar".into()));
        }
        self.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: self.next_user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.users.push(user.clone());
        Ok(user)
    }

    fn alumni_conflict(&self, input: &AlumniInput, except: Option<i32>) -> bool {
        self.alumni
            .iter()
            .filter(|a| Some(a.id) != except)
            .any(|a| a.nim == input.nim || a.email == input.email)
    }

    fn owns(&self, pekerjaan: &Pekerjaan, scope: OwnerScope) -> bool {
        match scope.owner_id() {
            None => true,
            Some(user_id) => self
                .alumni
                .iter()
                .any(|a| a.id == pekerjaan.alumni_id && a.user_id == user_id),
        }
    }
}

pub struct MemoryStore {
    tables: Mutex<Tables>,
    healthy: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            healthy: AtomicBool::new(true),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the health probe fail (or succeed again)
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, AtomicOrdering::SeqCst);
    }

    /// Seed a user with an already computed bcrypt hash
    pub fn seed_user(&self, username: &str, email: &str, password_hash: &str, role: Role) -> User {
        self.lock()
            .insert_user(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                role,
            })
            .unwrap()
    }

    /// Seed an alumni row owned by `user_id`
    pub fn seed_alumni(&self, user_id: i32, nim: &str, nama: &str) -> Alumni {
        let mut tables = self.lock();
        tables.next_alumni_id += 1;
        let now = Utc::now();
        let alumni = Alumni {
            id: tables.next_alumni_id,
            user_id,
            nim: nim.to_string(),
            nama: nama.to_string(),
            jurusan: "Informatika".to_string(),
            angkatan: 2018,
            tahun_lulus: 2022,
            email: format!("{}@alumni.test", nim),
            no_telepon: String::new(),
            alamat: String::new(),
            status_kematian: false,
            created_at: now,
            updated_at: now,
        };
        tables.alumni.push(alumni.clone());
        alumni
    }

    pub fn file_count(&self) -> usize {
        self.lock().files.len()
    }

    /// Leave a file record flagged as if a delete had stopped halfway
    pub fn mark_file_pending_delete(&self, id: &str) {
        let id = ObjectId::parse_str(id).unwrap();
        if let Some(record) = self.lock().files.iter_mut().find(|f| f.id == Some(id)) {
            record.pending_delete_at = Some(bson::DateTime::now());
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        // A poisoned lock only means another test thread panicked.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn directed(ordering: Ordering, order: SortDirection) -> Ordering {
    match order {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn slice<T: Clone>(rows: &[T], offset: i64, limit: i64) -> Vec<T> {
    rows.iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_login(&self, identifier: &str) -> Result<Vec<User>, DatabaseError> {
        Ok(self
            .lock()
            .users
            .iter()
            .filter(|u| u.username == identifier || u.email == identifier)
            .cloned()
            .collect())
    }

    async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        self.lock().insert_user(user)
    }
}

#[async_trait]
impl AlumniRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Alumni>, DatabaseError> {
        let mut rows = self.lock().alumni.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find(&self, id: i32) -> Result<Option<Alumni>, DatabaseError> {
        Ok(self.lock().alumni.iter().find(|a| a.id == id).cloned())
    }

    async fn create_with_user(&self, input: &AlumniInput, password_hash: &str) -> Result<Alumni, DatabaseError> {
        let mut tables = self.lock();
        if tables.alumni_conflict(input, None) {
            return Err(DatabaseError::Conflict("NIM, username atau email sudah terdaftar".into()));
        }
        let user = tables
            .insert_user(NewUser {
                username: input.nama.clone(),
                email: input.email.clone(),
                password_hash: password_hash.to_string(),
                role: Role::User,
            })
            .map_err(|_| DatabaseError::Conflict("NIM, username atau email sudah terdaftar".into()))?;

        tables.next_alumni_id += 1;
        let now = Utc::now();
        let alumni = Alumni {
            id: tables.next_alumni_id,
            user_id: user.id,
            nim: input.nim.clone(),
            nama: input.nama.clone(),
            jurusan: input.jurusan.clone(),
            angkatan: input.angkatan,
            tahun_lulus: input.tahun_lulus,
            email: input.email.clone(),
            no_telepon: input.no_telepon.clone(),
            alamat: input.alamat.clone(),
            status_kematian: input.status_kematian,
            created_at: now,
            updated_at: now,
        };
        tables.alumni.push(alumni.clone());
        Ok(alumni)
    }

    async fn update(&self, id: i32, input: &AlumniInput) -> Result<Option<Alumni>, DatabaseError> {
        let mut tables = self.lock();
        if tables.alumni_conflict(input, Some(id)) {
            return Err(DatabaseError::Conflict("NIM, username atau email sudah terdaftar".into()));
        }
        let Some(row) = tables.alumni.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        row.nim = input.nim.clone();
        row.nama = input.nama.clone();
        row.jurusan = input.jurusan.clone();
        row.angkatan = input.angkatan;
        row.tahun_lulus = input.tahun_lulus;
        row.email = input.email.clone();
        row.no_telepon = input.no_telepon.clone();
        row.alamat = input.alamat.clone();
        row.status_kematian = input.status_kematian;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut tables = self.lock();
        if tables.pekerjaan.iter().any(|p| p.alumni_id == id) {
            return Err(DatabaseError::InvalidReference(
                "alumni masih direferensikan data pekerjaan".into(),
            ));
        }
        let before = tables.alumni.len();
        tables.alumni.retain(|a| a.id != id);
        Ok(tables.alumni.len() < before)
    }

    async fn set_status_kematian(&self, id: i32, status: bool) -> Result<Option<Alumni>, DatabaseError> {
        let mut tables = self.lock();
        Ok(tables.alumni.iter_mut().find(|a| a.id == id).map(|row| {
            row.status_kematian = status;
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn page(&self, request: &PageRequest<AlumniSort>) -> Result<Page<Alumni>, DatabaseError> {
        let mut rows: Vec<Alumni> = self
            .lock()
            .alumni
            .iter()
            .filter(|a| {
                request.search.is_empty()
                    || contains_ci(&a.nama, &request.search)
                    || contains_ci(&a.email, &request.search)
                    || contains_ci(&a.jurusan, &request.search)
            })
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            let ordering = match request.sort {
                AlumniSort::Id => a.id.cmp(&b.id),
                AlumniSort::Nama => a.nama.cmp(&b.nama),
                AlumniSort::Email => a.email.cmp(&b.email),
                AlumniSort::TahunLulus => a.tahun_lulus.cmp(&b.tahun_lulus),
                AlumniSort::CreatedAt => a.created_at.cmp(&b.created_at),
            }
            .then(a.id.cmp(&b.id));
            directed(ordering, request.order)
        });

        Ok(Page {
            total: rows.len() as i64,
            items: slice(&rows, request.offset(), request.limit),
        })
    }
}

fn write_fields(row: &mut Pekerjaan, f: &PekerjaanFields) {
    row.nama_perusahaan = f.nama_perusahaan.clone();
    row.posisi_jabatan = f.posisi_jabatan.clone();
    row.bidang_industri = f.bidang_industri.clone();
    row.lokasi_kerja = f.lokasi_kerja.clone();
    row.gaji_range = f.gaji_range.clone();
    row.tanggal_mulai_kerja = f.tanggal_mulai_kerja;
    row.tanggal_selesai_kerja = f.tanggal_selesai_kerja;
    row.status_pekerjaan = f.status_pekerjaan.clone();
    row.deskripsi_pekerjaan = f.deskripsi_pekerjaan.clone();
}

#[async_trait]
impl PekerjaanRepository for MemoryStore {
    async fn list_live(&self) -> Result<Vec<Pekerjaan>, DatabaseError> {
        let mut rows: Vec<Pekerjaan> = self.lock().pekerjaan.iter().filter(|p| !p.is_deleted).cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find(&self, id: i32) -> Result<Option<Pekerjaan>, DatabaseError> {
        Ok(self.lock().pekerjaan.iter().find(|p| p.id == id).cloned())
    }

    async fn list_by_alumni(&self, alumni_id: i32) -> Result<Vec<Pekerjaan>, DatabaseError> {
        let mut rows: Vec<Pekerjaan> = self
            .lock()
            .pekerjaan
            .iter()
            .filter(|p| p.alumni_id == alumni_id && !p.is_deleted)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.tanggal_mulai_kerja.cmp(&a.tanggal_mulai_kerja));
        Ok(rows)
    }

    async fn list_trashed(&self, scope: OwnerScope) -> Result<Vec<Pekerjaan>, DatabaseError> {
        let tables = self.lock();
        let mut rows: Vec<Pekerjaan> = tables
            .pekerjaan
            .iter()
            .filter(|p| p.is_deleted && tables.owns(p, scope))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(rows)
    }

    async fn create(&self, new: &NewPekerjaan) -> Result<Pekerjaan, DatabaseError> {
        let mut tables = self.lock();
        if !tables.alumni.iter().any(|a| a.id == new.alumni_id) {
            return Err(DatabaseError::InvalidReference("alumni_id tidak ditemukan".into()));
        }
        tables.next_pekerjaan_id += 1;
        let now = Utc::now();
        let f = &new.fields;
        let row = Pekerjaan {
            id: tables.next_pekerjaan_id,
            alumni_id: new.alumni_id,
            nama_perusahaan: f.nama_perusahaan.clone(),
            posisi_jabatan: f.posisi_jabatan.clone(),
            bidang_industri: f.bidang_industri.clone(),
            lokasi_kerja: f.lokasi_kerja.clone(),
            gaji_range: f.gaji_range.clone(),
            tanggal_mulai_kerja: f.tanggal_mulai_kerja,
            tanggal_selesai_kerja: f.tanggal_selesai_kerja,
            status_pekerjaan: f.status_pekerjaan.clone(),
            deskripsi_pekerjaan: f.deskripsi_pekerjaan.clone(),
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };
        tables.pekerjaan.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: i32, fields: &PekerjaanFields) -> Result<Option<Pekerjaan>, DatabaseError> {
        let mut tables = self.lock();
        Ok(tables
            .pekerjaan
            .iter_mut()
            .find(|p| p.id == id && !p.is_deleted)
            .map(|row| {
                write_fields(row, fields);
                row.updated_at = Utc::now();
                row.clone()
            }))
    }

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut tables = self.lock();
        let before = tables.pekerjaan.len();
        tables.pekerjaan.retain(|p| p.id != id);
        Ok(tables.pekerjaan.len() < before)
    }

    async fn soft_delete(&self, id: i32, scope: OwnerScope) -> Result<Option<Pekerjaan>, DatabaseError> {
        let mut tables = self.lock();
        let Some(index) = tables.pekerjaan.iter().position(|p| p.id == id) else {
            return Ok(None);
        };
        if !tables.owns(&tables.pekerjaan[index], scope) {
            return Ok(None);
        }
        let now = Utc::now();
        let row = &mut tables.pekerjaan[index];
        row.is_deleted = true;
        row.deleted_at = row.deleted_at.or(Some(now));
        row.updated_at = now;
        Ok(Some(row.clone()))
    }

    async fn restore(&self, id: i32, scope: OwnerScope) -> Result<Option<Pekerjaan>, DatabaseError> {
        let mut tables = self.lock();
        let Some(index) = tables.pekerjaan.iter().position(|p| p.id == id) else {
            return Ok(None);
        };
        if !tables.owns(&tables.pekerjaan[index], scope) {
            return Ok(None);
        }
        let row = &mut tables.pekerjaan[index];
        row.is_deleted = false;
        row.deleted_at = None;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn hard_delete(&self, id: i32, scope: OwnerScope) -> Result<bool, DatabaseError> {
        let mut tables = self.lock();
        let Some(index) = tables.pekerjaan.iter().position(|p| p.id == id) else {
            return Ok(false);
        };
        let row = &tables.pekerjaan[index];
        if !row.is_deleted || !tables.owns(row, scope) {
            return Ok(false);
        }
        tables.pekerjaan.remove(index);
        Ok(true)
    }

    async fn page(&self, request: &PageRequest<PekerjaanSort>) -> Result<Page<Pekerjaan>, DatabaseError> {
        let mut rows: Vec<Pekerjaan> = self
            .lock()
            .pekerjaan
            .iter()
            .filter(|p| !p.is_deleted)
            .filter(|p| {
                request.search.is_empty()
                    || contains_ci(&p.nama_perusahaan, &request.search)
                    || contains_ci(&p.posisi_jabatan, &request.search)
                    || contains_ci(&p.bidang_industri, &request.search)
                    || contains_ci(&p.lokasi_kerja, &request.search)
            })
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            let ordering = match request.sort {
                PekerjaanSort::Id => a.id.cmp(&b.id),
                PekerjaanSort::NamaPerusahaan => a.nama_perusahaan.cmp(&b.nama_perusahaan),
                PekerjaanSort::PosisiJabatan => a.posisi_jabatan.cmp(&b.posisi_jabatan),
                PekerjaanSort::TanggalMulaiKerja => a.tanggal_mulai_kerja.cmp(&b.tanggal_mulai_kerja),
                PekerjaanSort::CreatedAt => a.created_at.cmp(&b.created_at),
                PekerjaanSort::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            }
            .then(a.id.cmp(&b.id));
            directed(ordering, request.order)
        });

        Ok(Page {
            total: rows.len() as i64,
            items: slice(&rows, request.offset(), request.limit),
        })
    }
}

#[async_trait]
impl PekerjaanDocRepository for MemoryStore {
    async fn list_live(&self) -> Result<Vec<PekerjaanDoc>, DatabaseError> {
        let mut rows: Vec<PekerjaanDoc> = self.lock().docs.iter().filter(|d| !d.is_deleted).cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find(&self, id: ObjectId) -> Result<Option<PekerjaanDoc>, DatabaseError> {
        Ok(self.lock().docs.iter().find(|d| d.id == Some(id)).cloned())
    }

    async fn list_by_alumni(&self, alumni_id: i32) -> Result<Vec<PekerjaanDoc>, DatabaseError> {
        let mut rows: Vec<PekerjaanDoc> = self
            .lock()
            .docs
            .iter()
            .filter(|d| d.alumni_id == alumni_id && !d.is_deleted)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_trashed(&self) -> Result<Vec<PekerjaanDoc>, DatabaseError> {
        let mut rows: Vec<PekerjaanDoc> = self.lock().docs.iter().filter(|d| d.is_deleted).cloned().collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }

    async fn create(&self, mut doc: PekerjaanDoc) -> Result<PekerjaanDoc, DatabaseError> {
        doc.id = Some(ObjectId::new());
        self.lock().docs.push(doc.clone());
        Ok(doc)
    }

    async fn update(&self, id: ObjectId, patch: &PekerjaanDocPatch) -> Result<Option<PekerjaanDoc>, DatabaseError> {
        let mut tables = self.lock();
        Ok(tables.docs.iter_mut().find(|d| d.id == Some(id)).map(|doc| {
            patch.apply_to(doc, Utc::now());
            doc.clone()
        }))
    }

    async fn set_deleted(&self, id: ObjectId, deleted: bool) -> Result<Option<PekerjaanDoc>, DatabaseError> {
        let mut tables = self.lock();
        Ok(tables.docs.iter_mut().find(|d| d.id == Some(id)).map(|doc| {
            doc.is_deleted = deleted;
            doc.updated_at = Utc::now();
            doc.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, DatabaseError> {
        let mut tables = self.lock();
        let before = tables.docs.len();
        tables.docs.retain(|d| d.id != Some(id));
        Ok(tables.docs.len() < before)
    }
}

#[async_trait]
impl FileRepository for MemoryStore {
    async fn insert(&self, file: NewFile) -> Result<FileRecord, DatabaseError> {
        let mut record = file.into_record(Utc::now());
        record.id = Some(ObjectId::new());
        self.lock().files.push(record.clone());
        Ok(record)
    }

    async fn list(&self, owner: Option<i32>) -> Result<Vec<FileRecord>, DatabaseError> {
        let mut rows: Vec<FileRecord> = self
            .lock()
            .files
            .iter()
            .filter(|f| f.pending_delete_at.is_none())
            .filter(|f| owner.map_or(true, |user_id| f.user_id == user_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(rows)
    }

    async fn find(&self, id: ObjectId) -> Result<Option<FileRecord>, DatabaseError> {
        Ok(self.lock().files.iter().find(|f| f.id == Some(id)).cloned())
    }

    async fn mark_pending_delete(&self, id: ObjectId) -> Result<bool, DatabaseError> {
        let mut tables = self.lock();
        match tables.files.iter_mut().find(|f| f.id == Some(id)) {
            Some(record) => {
                record.pending_delete_at = Some(bson::DateTime::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ObjectId, owner: Option<i32>) -> Result<bool, DatabaseError> {
        let mut tables = self.lock();
        let before = tables.files.len();
        tables
            .files
            .retain(|f| !(f.id == Some(id) && owner.map_or(true, |user_id| f.user_id == user_id)));
        Ok(tables.files.len() < before)
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        if self.healthy.load(AtomicOrdering::SeqCst) {
            Ok(())
        } else {
            Err(DatabaseError::QueryError("store unavailable".into()))
        }
    }
}
