use async_trait::async_trait;

use crate::db::models::{Document, DocumentFilter};
use crate::error::AppError;

/// Repository trait for document operations.
///
/// This trait allows swapping the database layer in tests and demo mode.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a freshly uploaded document.
    async fn insert(&self, doc: Document) -> Result<(), AppError>;

    /// Find a document by its id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, AppError>;

    /// List a user's documents matching the filter, most recently updated first.
    async fn list_for_user(
        &self,
        user_id: &str,
        filter: &DocumentFilter,
    ) -> Result<Vec<Document>, AppError>;

    /// Replace a stored document. Fails with `NotFound` when the id is unknown.
    async fn update(&self, doc: Document) -> Result<(), AppError>;

    /// Delete a document. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    /// Move every document of a folder back to the unfiled set.
    ///
    /// Returns the number of documents that were moved.
    async fn unfile_folder(&self, user_id: &str, folder_id: &str) -> Result<u64, AppError>;
}

/// MongoDB implementation of the DocumentRepository.
///
/// This is only available when the `ssr` feature is enabled (i.e., server-side).
#[cfg(feature = "ssr")]
pub struct MongoDocumentRepository {
    collection: mongodb::Collection<Document>,
}

#[cfg(feature = "ssr")]
impl MongoDocumentRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("documents"),
        }
    }
}

#[cfg(feature = "ssr")]
#[async_trait]
impl DocumentRepository for MongoDocumentRepository {
    async fn insert(&self, doc: Document) -> Result<(), AppError> {
        self.collection
            .insert_one(&doc)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "id": id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        filter: &DocumentFilter,
    ) -> Result<Vec<Document>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::{doc, Bson};

        let mut query = doc! { "user_id": user_id };
        match filter {
            DocumentFilter::All => {}
            // `null` also matches documents where the field is missing
            DocumentFilter::Unfiled => {
                query.insert("folder_id", Bson::Null);
            }
            DocumentFilter::InFolder(folder_id) => {
                query.insert("folder_id", folder_id.as_str());
            }
        }

        let mut cursor = self
            .collection
            .find(query)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut documents = Vec::new();
        while let Some(doc) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            documents.push(doc);
        }

        // Timestamps are stored as RFC 3339 strings, so order in memory.
        documents.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(documents)
    }

    async fn update(&self, doc: Document) -> Result<(), AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .replace_one(doc! { "id": &doc.id }, &doc)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Document '{}' not found", doc.id)));
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

    async fn unfile_folder(&self, user_id: &str, folder_id: &str) -> Result<u64, AppError> {
        use mongodb::bson::{doc, Bson};

        let result = self
            .collection
            .update_many(
                doc! { "user_id": user_id, "folder_id": folder_id },
                doc! { "$set": { "folder_id": Bson::Null } },
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.modified_count)
    }
}
