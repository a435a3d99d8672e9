use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};

use super::MongoStore;
use crate::database::manager::DatabaseError;
use crate::database::models::{PekerjaanDoc, PekerjaanDocPatch};
use crate::database::repository::PekerjaanDocRepository;

fn newest_first() -> Option<FindOptions> {
    Some(FindOptions::builder().sort(doc! { "created_at": -1 }).build())
}

fn return_updated() -> Option<FindOneAndUpdateOptions> {
    Some(
        FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build(),
    )
}

/// `$set` body for a partial update; `updated_at` is always bumped
fn set_document(patch: &PekerjaanDocPatch) -> Document {
    let mut set = Document::new();
    let text_fields = [
        ("nama_perusahaan", &patch.nama_perusahaan),
        ("posisi_jabatan", &patch.posisi_jabatan),
        ("bidang_industri", &patch.bidang_industri),
        ("lokasi_kerja", &patch.lokasi_kerja),
        ("gaji_range", &patch.gaji_range),
        ("status_pekerjaan", &patch.status_pekerjaan),
        ("deskripsi_pekerjaan", &patch.deskripsi_pekerjaan),
    ];
    for (key, value) in text_fields {
        if let Some(value) = value {
            set.insert(key, value.as_str());
        }
    }
    let date_fields = [
        ("tanggal_mulai_kerja", patch.tanggal_mulai_kerja),
        ("tanggal_selesai_kerja", patch.tanggal_selesai_kerja),
    ];
    for (key, value) in date_fields {
        if let Some(date) = value {
            let bson = date.map(|d| Bson::DateTime(bson::DateTime::from_chrono(d))).unwrap_or(Bson::Null);
            set.insert(key, bson);
        }
    }
    set.insert("updated_at", bson::DateTime::from_chrono(Utc::now()));
    set
}

#[async_trait]
impl PekerjaanDocRepository for MongoStore {
    async fn list_live(&self) -> Result<Vec<PekerjaanDoc>, DatabaseError> {
        let cursor = self.pekerjaan().find(doc! { "is_deleted": false }, newest_first()).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find(&self, id: ObjectId) -> Result<Option<PekerjaanDoc>, DatabaseError> {
        Ok(self.pekerjaan().find_one(doc! { "_id": id }, None).await?)
    }

    async fn list_by_alumni(&self, alumni_id: i32) -> Result<Vec<PekerjaanDoc>, DatabaseError> {
        let filter = doc! { "alumni_id": alumni_id, "is_deleted": false };
        let cursor = self.pekerjaan().find(filter, newest_first()).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_trashed(&self) -> Result<Vec<PekerjaanDoc>, DatabaseError> {
        let options = FindOptions::builder().sort(doc! { "updated_at": -1 }).build();
        let cursor = self.pekerjaan().find(doc! { "is_deleted": true }, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn create(&self, mut document: PekerjaanDoc) -> Result<PekerjaanDoc, DatabaseError> {
        document.id = None;
        let result = self.pekerjaan().insert_one(&document, None).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| DatabaseError::QueryError("insert_one returned a non-ObjectId id".to_string()))?;
        document.id = Some(id);
        Ok(document)
    }

    async fn update(&self, id: ObjectId, patch: &PekerjaanDocPatch) -> Result<Option<PekerjaanDoc>, DatabaseError> {
        let update = doc! { "$set": set_document(patch) };
        Ok(self
            .pekerjaan()
            .find_one_and_update(doc! { "_id": id }, update, return_updated())
            .await?)
    }

    async fn set_deleted(&self, id: ObjectId, deleted: bool) -> Result<Option<PekerjaanDoc>, DatabaseError> {
        let update = doc! {
            "$set": {
                "is_deleted": deleted,
                "updated_at": bson::DateTime::from_chrono(Utc::now()),
            }
        };
        Ok(self
            .pekerjaan()
            .find_one_and_update(doc! { "_id": id }, update, return_updated())
            .await?)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, DatabaseError> {
        let result = self.pekerjaan().delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }
}
