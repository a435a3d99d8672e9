use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Upload category. Each has its own size cap and MIME whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Foto,
    Sertifikat,
}

impl FileCategory {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "foto" => Some(FileCategory::Foto),
            "sertifikat" => Some(FileCategory::Sertifikat),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Foto => "foto",
            FileCategory::Sertifikat => "sertifikat",
        }
    }
}

/// Metadata document in the `files` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: i32,
    pub file_name: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub file_category: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_delete_at: Option<bson::DateTime>,
}

#[derive(Debug, Clone)]
pub struct NewFile {
    pub user_id: i32,
    pub file_name: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub file_category: FileCategory,
}

impl NewFile {
    pub fn into_record(self, uploaded_at: DateTime<Utc>) -> FileRecord {
        FileRecord {
            id: None,
            user_id: self.user_id,
            file_name: self.file_name,
            original_name: self.original_name,
            file_path: self.file_path,
            file_size: self.file_size,
            file_type: self.file_type,
            file_category: self.file_category.as_str().to_string(),
            uploaded_at,
            pending_delete_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileView {
    pub id: String,
    pub user_id: i32,
    pub file_name: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub file_category: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<FileRecord> for FileView {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: record.user_id,
            file_name: record.file_name,
            original_name: record.original_name,
            file_path: record.file_path,
            file_size: record.file_size,
            file_type: record.file_type,
            file_category: record.file_category,
            uploaded_at: record.uploaded_at,
        }
    }
}
