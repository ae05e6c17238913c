//! Repositories backed by a shared [`DocumentStore`].
//!
//! Used in demo mode (no MongoDB required) and by the integration tests.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::db::folder_repository::FolderRepository;
use crate::db::models::{Document, DocumentFilter, Folder};
use crate::db::repository::DocumentRepository;
use crate::error::AppError;
use crate::store::DocumentStore;

pub type SharedStore = Arc<RwLock<DocumentStore>>;

pub fn shared_store() -> SharedStore {
    Arc::new(RwLock::new(DocumentStore::new()))
}

fn read(store: &SharedStore) -> Result<RwLockReadGuard<'_, DocumentStore>, AppError> {
    store
        .read()
        .map_err(|_| AppError::Internal("document store lock poisoned".into()))
}

fn write(store: &SharedStore) -> Result<RwLockWriteGuard<'_, DocumentStore>, AppError> {
    store
        .write()
        .map_err(|_| AppError::Internal("document store lock poisoned".into()))
}

pub struct MemoryDocumentRepository {
    store: SharedStore,
}

impl MemoryDocumentRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DocumentRepository for MemoryDocumentRepository {
    async fn insert(&self, doc: Document) -> Result<(), AppError> {
        write(&self.store)?.add_document(doc);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, AppError> {
        Ok(read(&self.store)?.document(id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        filter: &DocumentFilter,
    ) -> Result<Vec<Document>, AppError> {
        Ok(read(&self.store)?
            .documents_in(filter)
            .into_iter()
            .filter(|d| d.user_id == user_id)
            .collect())
    }

    async fn update(&self, doc: Document) -> Result<(), AppError> {
        let mut store = write(&self.store)?;
        if store.document(&doc.id).is_none() {
            return Err(AppError::NotFound(format!("Document '{}' not found", doc.id)));
        }
        store.add_document(doc);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(write(&self.store)?.remove_document(id).is_some())
    }

    async fn unfile_folder(&self, user_id: &str, folder_id: &str) -> Result<u64, AppError> {
        let mut store = write(&self.store)?;
        let ids: Vec<String> = store
            .documents()
            .iter()
            .filter(|d| d.user_id == user_id && d.folder_id.as_deref() == Some(folder_id))
            .map(|d| d.id.clone())
            .collect();

        for id in &ids {
            if let Some(mut doc) = store.document(id).cloned() {
                doc.folder_id = None;
                store.add_document(doc);
            }
        }

        Ok(ids.len() as u64)
    }
}

pub struct MemoryFolderRepository {
    store: SharedStore,
}

impl MemoryFolderRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl FolderRepository for MemoryFolderRepository {
    async fn insert(&self, folder: Folder) -> Result<(), AppError> {
        write(&self.store)?.add_folder(folder);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Folder>, AppError> {
        Ok(read(&self.store)?.folder(id).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Folder>, AppError> {
        let mut folders: Vec<Folder> = read(&self.store)?
            .folders()
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(folders)
    }

    async fn update(&self, folder: Folder) -> Result<(), AppError> {
        let mut store = write(&self.store)?;
        if store.folder(&folder.id).is_none() {
            return Err(AppError::NotFound(format!("Folder '{}' not found", folder.id)));
        }
        store.add_folder(folder);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(write(&self.store)?.remove_folder(id).is_some())
    }

    async fn adjust_document_count(&self, id: &str, delta: i64) -> Result<(), AppError> {
        write(&self.store)?.update_folder(id, |f| {
            f.document_count = (f.document_count + delta).max(0);
        });
        Ok(())
    }

    async fn reparent_children(
        &self,
        user_id: &str,
        parent_id: &str,
        new_parent: Option<&str>,
    ) -> Result<u64, AppError> {
        let mut store = write(&self.store)?;
        let ids: Vec<String> = store
            .folders()
            .iter()
            .filter(|f| f.user_id == user_id && f.parent_id.as_deref() == Some(parent_id))
            .map(|f| f.id.clone())
            .collect();

        for id in &ids {
            store.update_folder(id, |f| f.parent_id = new_parent.map(str::to_string));
        }

        Ok(ids.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{DocumentStatus, LensSet};
    use chrono::Utc;

    fn document(id: &str, user: &str, folder: Option<&str>) -> Document {
        Document {
            id: id.to_string(),
            title: id.to_string(),
            content: String::new(),
            original_file_name: format!("{id}.txt"),
            file_type: "text/plain".to_string(),
            file_size: 1,
            storage_key: format!("users/{user}/documents/{id}/{id}.txt"),
            user_id: user.to_string(),
            folder_id: folder.map(str::to_string),
            tags: vec![],
            lenses: LensSet::default(),
            status: DocumentStatus::Ready,
            preview: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn folder(id: &str, name: &str, parent: Option<&str>) -> Folder {
        Folder {
            id: id.to_string(),
            name: name.to_string(),
            user_id: "u1".to_string(),
            parent_id: parent.map(str::to_string),
            document_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_documents_are_scoped_by_user() {
        let store = shared_store();
        let repo = MemoryDocumentRepository::new(store);
        repo.insert(document("a", "u1", None)).await.unwrap();
        repo.insert(document("b", "u2", None)).await.unwrap();

        let docs = repo.list_for_user("u1", &DocumentFilter::All).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "a");
    }

    #[tokio::test]
    async fn test_update_unknown_document_fails() {
        let repo = MemoryDocumentRepository::new(shared_store());
        let result = repo.update(document("ghost", "u1", None)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unfile_folder() {
        let repo = MemoryDocumentRepository::new(shared_store());
        repo.insert(document("a", "u1", Some("f1"))).await.unwrap();
        repo.insert(document("b", "u1", Some("f1"))).await.unwrap();
        repo.insert(document("c", "u1", Some("f2"))).await.unwrap();

        assert_eq!(repo.unfile_folder("u1", "f1").await.unwrap(), 2);
        let unfiled = repo.list_for_user("u1", &DocumentFilter::Unfiled).await.unwrap();
        assert_eq!(unfiled.len(), 2);
    }

    #[tokio::test]
    async fn test_folder_count_never_negative() {
        let repo = MemoryFolderRepository::new(shared_store());
        repo.insert(folder("f1", "Research", None)).await.unwrap();
        repo.adjust_document_count("f1", 2).await.unwrap();
        repo.adjust_document_count("f1", -5).await.unwrap();
        assert_eq!(repo.find_by_id("f1").await.unwrap().unwrap().document_count, 0);
    }

    #[tokio::test]
    async fn test_folders_sorted_and_reparented() {
        let repo = MemoryFolderRepository::new(shared_store());
        repo.insert(folder("s", "Strategy", None)).await.unwrap();
        repo.insert(folder("p", "Planning", Some("s"))).await.unwrap();
        repo.insert(folder("r", "Research", None)).await.unwrap();

        let names: Vec<String> = repo
            .list_for_user("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["Planning", "Research", "Strategy"]);

        assert_eq!(repo.reparent_children("u1", "s", None).await.unwrap(), 1);
        assert_eq!(repo.find_by_id("p").await.unwrap().unwrap().parent_id, None);
    }
}
