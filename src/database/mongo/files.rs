use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::options::FindOptions;

use super::MongoStore;
use crate::database::manager::DatabaseError;
use crate::database::models::{FileRecord, NewFile};
use crate::database::repository::FileRepository;

#[async_trait]
impl FileRepository for MongoStore {
    async fn insert(&self, file: NewFile) -> Result<FileRecord, DatabaseError> {
        let mut record = file.into_record(Utc::now());
        let result = self.files().insert_one(&record, None).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| DatabaseError::QueryError("insert_one returned a non-ObjectId id".to_string()))?;
        record.id = Some(id);
        Ok(record)
    }

    async fn list(&self, owner: Option<i32>) -> Result<Vec<FileRecord>, DatabaseError> {
        let mut filter: Document = doc! { "pending_delete_at": { "$exists": false } };
        if let Some(user_id) = owner {
            filter.insert("user_id", user_id);
        }
        let options = FindOptions::builder().sort(doc! { "uploaded_at": -1 }).build();
        let cursor = self.files().find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find(&self, id: ObjectId) -> Result<Option<FileRecord>, DatabaseError> {
        Ok(self.files().find_one(doc! { "_id": id }, None).await?)
    }

    async fn mark_pending_delete(&self, id: ObjectId) -> Result<bool, DatabaseError> {
        let update = doc! { "$set": { "pending_delete_at": bson::DateTime::now() } };
        let result = self.files().update_one(doc! { "_id": id }, update, None).await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: ObjectId, owner: Option<i32>) -> Result<bool, DatabaseError> {
        let mut filter = doc! { "_id": id };
        if let Some(user_id) = owner {
            filter.insert("user_id", user_id);
        }
        let result = self.files().delete_one(filter, None).await?;
        Ok(result.deleted_count > 0)
    }
}
