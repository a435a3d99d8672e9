use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::pekerjaan_doc_service::parse_object_id;
use crate::database::models::{FileCategory, FileView, NewFile};
use crate::database::{with_deadline, FileRepository};
use crate::error::ApiError;
use crate::middleware::AuthUser;

pub const MAX_FOTO_BYTES: usize = 1024 * 1024;
pub const MAX_SERTIFIKAT_BYTES: usize = 2 * 1024 * 1024;

const FOTO_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];
const SERTIFIKAT_TYPES: [&str; 1] = ["application/pdf"];

const NOT_FOUND: &str = "file tidak ditemukan";

/// The `file` part of an upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Multipart fields relevant to an upload
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub category: Option<String>,
    pub user_id: Option<String>,
}

/// Size cap and MIME whitelist for a category
pub fn validate_upload(category: FileCategory, size: usize, content_type: &str) -> Result<(), ApiError> {
    let (max, allowed, too_big, bad_type) = match category {
        FileCategory::Foto => (
            MAX_FOTO_BYTES,
            &FOTO_TYPES[..],
            "ukuran foto maksimal 1MB",
            "format foto hanya jpeg/png/jpg",
        ),
        FileCategory::Sertifikat => (
            MAX_SERTIFIKAT_BYTES,
            &SERTIFIKAT_TYPES[..],
            "ukuran sertifikat maksimal 2MB",
            "format sertifikat hanya PDF",
        ),
    };

    if size > max {
        return Err(ApiError::bad_request(too_big));
    }
    if !allowed.contains(&content_type) {
        return Err(ApiError::bad_request(bad_type));
    }
    Ok(())
}

fn parse_category(raw: Option<&str>) -> Result<FileCategory, ApiError> {
    match raw.map(str::trim).filter(|c| !c.is_empty()) {
        None => Ok(FileCategory::Foto),
        Some(value) => FileCategory::parse(value)
            .ok_or_else(|| ApiError::bad_request("kategori file hanya foto atau sertifikat")),
    }
}

/// UUID v4 plus the original extension as given
fn stored_name(original_name: &str) -> String {
    match Path::new(original_name).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{}.{}", Uuid::new_v4(), ext),
        _ => Uuid::new_v4().to_string(),
    }
}

/// Upload validation, blob storage under `<upload_root>/<category>/`, and
/// owner-scoped access to the metadata records
#[derive(Clone)]
pub struct FileService {
    repo: Arc<dyn FileRepository>,
    upload_root: PathBuf,
    deadline: Duration,
}

impl FileService {
    pub fn new(repo: Arc<dyn FileRepository>, upload_root: PathBuf, deadline: Duration) -> Self {
        Self {
            repo,
            upload_root,
            deadline,
        }
    }

    pub async fn upload(&self, caller: &AuthUser, form: UploadForm) -> Result<FileView, ApiError> {
        let mut owner = caller.user_id;
        if caller.is_admin() {
            if let Some(id) = form.user_id.as_deref().and_then(|raw| raw.trim().parse::<i32>().ok()) {
                owner = id;
            }
        }

        let file = form.file.ok_or_else(|| ApiError::bad_request("file wajib diupload"))?;
        let category = parse_category(form.category.as_deref())?;
        validate_upload(category, file.bytes.len(), &file.content_type)?;

        let file_name = stored_name(&file.original_name);
        let dir = self.upload_root.join(category.as_str());
        let path = dir.join(&file_name);

        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            error!("Failed to create upload directory {}: {}", dir.display(), e);
            ApiError::internal_server_error("Gagal menyimpan file")
        })?;
        tokio::fs::write(&path, &file.bytes).await.map_err(|e| {
            error!("Failed to write upload {}: {}", path.display(), e);
            ApiError::internal_server_error("Gagal menyimpan file")
        })?;

        let new = NewFile {
            user_id: owner,
            file_name,
            original_name: file.original_name,
            file_path: path.to_string_lossy().into_owned(),
            file_size: file.bytes.len() as i64,
            file_type: file.content_type,
            file_category: category,
        };

        match with_deadline(self.deadline, self.repo.insert(new)).await {
            Ok(record) => {
                info!("Stored {} ({} bytes) for user {}", record.file_path, record.file_size, owner);
                Ok(FileView::from(record))
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                    warn!("Failed to remove orphaned upload {}: {}", path.display(), cleanup);
                }
                Err(e.into())
            }
        }
    }

    pub async fn list(&self, caller: &AuthUser) -> Result<Vec<FileView>, ApiError> {
        let records = with_deadline(self.deadline, self.repo.list(caller.scope().owner_id())).await?;
        Ok(records.into_iter().map(FileView::from).collect())
    }

    pub async fn get(&self, caller: &AuthUser, id: &str) -> Result<FileView, ApiError> {
        let oid = parse_object_id(id)?;
        // Records mid-delete stay hidden, as in `list`; `delete` still sees them
        let record = with_deadline(self.deadline, self.repo.find(oid))
            .await?
            .filter(|record| record.pending_delete_at.is_none())
            .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

        if !caller.scope().permits(record.user_id) {
            return Err(ApiError::forbidden("akses ditolak"));
        }
        Ok(FileView::from(record))
    }

    /// Two-phase delete: flag the record, remove the blob, then the record.
    /// A failure after the flag leaves it hidden so a retry can finish the job.
    pub async fn delete(&self, caller: &AuthUser, id: &str) -> Result<(), ApiError> {
        let oid = parse_object_id(id)?;
        let scope = caller.scope();

        let record = with_deadline(self.deadline, self.repo.find(oid))
            .await?
            .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
        if !scope.permits(record.user_id) {
            return Err(ApiError::forbidden("tidak boleh hapus file milik user lain"));
        }

        if !with_deadline(self.deadline, self.repo.mark_pending_delete(oid)).await? {
            return Err(ApiError::not_found(NOT_FOUND));
        }

        match tokio::fs::remove_file(&record.file_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Blob {} already missing, removing metadata only", record.file_path);
            }
            Err(e) => {
                error!("Failed to remove blob {}: {}", record.file_path, e);
                return Err(ApiError::internal_server_error("Gagal menghapus file"));
            }
        }

        if !with_deadline(self.deadline, self.repo.delete(oid, scope.owner_id())).await? {
            return Err(ApiError::not_found(NOT_FOUND));
        }

        info!("File {} deleted by user {}", id, caller.user_id);
        Ok(())
    }
}
