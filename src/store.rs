//! In-memory mirror of a user's documents and folders.
//!
//! The UI keeps one store per page and mutates it optimistically before the
//! server confirms; demo mode and the integration tests use the same store as
//! the backing state of the in-memory repositories.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::models::{Document, DocumentFilter, DocumentStatus, Folder, LensSet};

/// Optional field updates applied by [`DocumentStore::update_document`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    /// `Some(None)` moves the document out of its folder.
    pub folder_id: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub lenses: Option<LensSet>,
    pub status: Option<DocumentStatus>,
}

impl DocumentPatch {
    pub fn apply(self, doc: &mut Document) {
        if let Some(title) = self.title {
            doc.title = title;
        }
        if let Some(content) = self.content {
            doc.content = content;
        }
        if let Some(folder_id) = self.folder_id {
            doc.folder_id = folder_id;
        }
        if let Some(tags) = self.tags {
            doc.tags = tags;
        }
        if let Some(lenses) = self.lenses {
            doc.lenses = lenses;
        }
        if let Some(status) = self.status {
            doc.status = status;
        }
        doc.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentStore {
    documents: Vec<Document>,
    folders: Vec<Folder>,
    current_id: Option<String>,
    loading: bool,
    uploading: bool,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_documents(&mut self, documents: Vec<Document>) {
        self.documents = documents;
    }

    pub fn set_folders(&mut self, folders: Vec<Folder>) {
        self.folders = folders;
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn set_current(&mut self, id: Option<String>) {
        self.current_id = id;
    }

    /// The document currently open in the reading view.
    pub fn current(&self) -> Option<&Document> {
        self.current_id.as_deref().and_then(|id| self.document(id))
    }

    /// Insert or replace a document by id.
    pub fn add_document(&mut self, document: Document) {
        match self.documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document,
            None => self.documents.push(document),
        }
    }

    /// Apply a patch; returns the updated document, or `None` when the id is unknown.
    pub fn update_document(&mut self, id: &str, patch: DocumentPatch) -> Option<&Document> {
        let doc = self.documents.iter_mut().find(|d| d.id == id)?;
        patch.apply(doc);
        Some(doc)
    }

    pub fn remove_document(&mut self, id: &str) -> Option<Document> {
        let idx = self.documents.iter().position(|d| d.id == id)?;
        if self.current_id.as_deref() == Some(id) {
            self.current_id = None;
        }
        Some(self.documents.remove(idx))
    }

    /// Insert or replace a folder by id.
    pub fn add_folder(&mut self, folder: Folder) {
        match self.folders.iter_mut().find(|f| f.id == folder.id) {
            Some(existing) => *existing = folder,
            None => self.folders.push(folder),
        }
    }

    pub fn update_folder<F>(&mut self, id: &str, mutate: F) -> Option<&Folder>
    where
        F: FnOnce(&mut Folder),
    {
        let folder = self.folders.iter_mut().find(|f| f.id == id)?;
        mutate(folder);
        folder.updated_at = Utc::now();
        Some(folder)
    }

    pub fn remove_folder(&mut self, id: &str) -> Option<Folder> {
        let idx = self.folders.iter().position(|f| f.id == id)?;
        Some(self.folders.remove(idx))
    }

    /// Documents matching the filter, most recently updated first.
    pub fn documents_in(&self, filter: &DocumentFilter) -> Vec<Document> {
        let mut docs: Vec<Document> = self
            .documents
            .iter()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        docs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        docs
    }

    /// Case-insensitive search over title, content, original file name and tags.
    pub fn search(&self, query: &str) -> Vec<Document> {
        self.documents_in(&DocumentFilter::All)
            .into_iter()
            .filter(|d| matches_query(d, query))
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn set_uploading(&mut self, uploading: bool) {
        self.uploading = uploading;
    }
}

/// Whether a document matches a free-text query. An empty query matches everything.
pub fn matches_query(doc: &Document, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    doc.title.to_lowercase().contains(&query)
        || doc.content.to_lowercase().contains(&query)
        || doc.original_file_name.to_lowercase().contains(&query)
        || doc.tags.iter().any(|t| t.to_lowercase().contains(&query))
}
