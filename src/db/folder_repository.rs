use async_trait::async_trait;

use crate::db::models::Folder;
use crate::error::AppError;

/// Repository trait for folder metadata.
#[async_trait]
pub trait FolderRepository: Send + Sync {
    async fn insert(&self, folder: Folder) -> Result<(), AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Folder>, AppError>;

    /// All folders of a user, sorted by name.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Folder>, AppError>;

    /// Replace a stored folder. Fails with `NotFound` when the id is unknown.
    async fn update(&self, folder: Folder) -> Result<(), AppError>;

    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    /// Add `delta` to the folder's document count.
    async fn adjust_document_count(&self, id: &str, delta: i64) -> Result<(), AppError>;

    /// Point every child of `parent_id` at `new_parent` instead.
    async fn reparent_children(
        &self,
        user_id: &str,
        parent_id: &str,
        new_parent: Option<&str>,
    ) -> Result<u64, AppError>;
}

/// MongoDB implementation of the FolderRepository.
#[cfg(feature = "ssr")]
pub struct MongoFolderRepository {
    collection: mongodb::Collection<Folder>,
}

#[cfg(feature = "ssr")]
impl MongoFolderRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("folders"),
        }
    }
}

#[cfg(feature = "ssr")]
#[async_trait]
impl FolderRepository for MongoFolderRepository {
    async fn insert(&self, folder: Folder) -> Result<(), AppError> {
        self.collection
            .insert_one(&folder)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Folder>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "id": id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Folder>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;

        let mut cursor = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "name": 1 })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut folders = Vec::new();
        while let Some(folder) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            folders.push(folder);
        }

        Ok(folders)
    }

    async fn update(&self, folder: Folder) -> Result<(), AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .replace_one(doc! { "id": &folder.id }, &folder)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Folder '{}' not found", folder.id)));
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .delete_one(doc! { "id": id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }

    async fn adjust_document_count(&self, id: &str, delta: i64) -> Result<(), AppError> {
        use mongodb::bson::doc;

        self.collection
            .update_one(doc! { "id": id }, doc! { "$inc": { "document_count": delta } })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Concurrent deletes can race the counter below zero.
        self.collection
            .update_one(
                doc! { "id": id, "document_count": { "$lt": 0_i64 } },
                doc! { "$set": { "document_count": 0_i64 } },
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn reparent_children(
        &self,
        user_id: &str,
        parent_id: &str,
        new_parent: Option<&str>,
    ) -> Result<u64, AppError> {
        use mongodb::bson::{doc, Bson};

        let new_parent = match new_parent {
            Some(id) => Bson::String(id.to_string()),
            None => Bson::Null,
        };

        let result = self
            .collection
            .update_many(
                doc! { "user_id": user_id, "parent_id": parent_id },
                doc! { "$set": { "parent_id": new_parent } },
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.modified_count)
    }
}
