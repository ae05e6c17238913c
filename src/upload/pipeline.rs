use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::folder_repository::FolderRepository;
use crate::db::models::{Document, DocumentStatus, LensSet};
use crate::db::repository::DocumentRepository;
use crate::error::AppError;
use crate::rendering::markdown::plain_preview;
use crate::storage::client::{document_key, StorageClient};
use crate::upload::extraction::{extract_text, title_from_file_name};
use crate::upload::progress::{ProgressTracker, UploadProgress};
use crate::upload::validation::{validate_files, FileDescriptor, FileValidationConfig};

/// Length of the plain-text excerpt stored with each document.
pub const PREVIEW_CHARS: usize = 200;

/// A file received in an upload request.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    /// MIME type sent by the client; may be empty.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl IncomingFile {
    pub fn descriptor(&self) -> FileDescriptor {
        FileDescriptor::new(self.name.clone(), self.bytes.len() as u64, self.mime.clone())
    }

    fn content_type(&self) -> &str {
        if self.mime.is_empty() {
            "application/octet-stream"
        } else {
            &self.mime
        }
    }
}

/// Result of an upload batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub documents: Vec<Document>,
    pub uploads: Vec<UploadProgress>,
    pub warnings: Vec<String>,
}

/// Everything an upload touches: metadata, folders, blobs and progress.
pub struct UploadPipeline<'a> {
    pub documents: &'a dyn DocumentRepository,
    pub folders: &'a dyn FolderRepository,
    pub storage: &'a dyn StorageClient,
    pub tracker: &'a ProgressTracker,
    pub config: &'a FileValidationConfig,
}

impl UploadPipeline<'_> {
    /// Validate, store and register a batch of files for `user_id`.
    ///
    /// Validation failures reject the whole batch before anything is stored.
    /// Once files are accepted, a storage or database failure marks that
    /// file's document and progress record as failed and the remaining files
    /// are still processed, so the outcome reports every file.
    pub async fn process_upload(
        &self,
        user_id: &str,
        folder_id: Option<&str>,
        files: Vec<IncomingFile>,
    ) -> Result<UploadOutcome, AppError> {
        if files.is_empty() {
            return Err(AppError::BadRequest("No file field found in request".into()));
        }

        let descriptors: Vec<FileDescriptor> = files.iter().map(IncomingFile::descriptor).collect();
        let warnings = validate_files(&descriptors, self.config)?;

        if let Some(folder_id) = folder_id {
            match self.folders.find_by_id(folder_id).await? {
                Some(folder) if folder.user_id == user_id => {}
                _ => return Err(AppError::NotFound(format!("Folder '{folder_id}' not found"))),
            }
        }

        let mut documents = Vec::with_capacity(files.len());
        for file in files {
            documents.push(self.process_file(user_id, folder_id, file).await);
        }

        let uploads = documents
            .iter()
            .filter_map(|doc| self.tracker.get(&doc.id))
            .collect();

        Ok(UploadOutcome {
            documents,
            uploads,
            warnings,
        })
    }

    async fn process_file(
        &self,
        user_id: &str,
        folder_id: Option<&str>,
        file: IncomingFile,
    ) -> Document {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut doc = Document {
            id: id.clone(),
            title: title_from_file_name(&file.name),
            content: String::new(),
            original_file_name: file.name.clone(),
            file_type: file.mime.clone(),
            file_size: file.bytes.len() as u64,
            storage_key: document_key(user_id, &id, &file.name),
            user_id: user_id.to_string(),
            folder_id: folder_id.map(str::to_string),
            tags: Vec::new(),
            lenses: LensSet::default(),
            status: DocumentStatus::Uploading,
            preview: None,
            created_at: now,
            updated_at: now,
        };
        self.tracker.begin(&id, &file.name);

        match self.store_file(&mut doc, &file).await {
            Ok(()) => {
                self.tracker.complete(&id);
                tracing::info!(
                    document_id = %id,
                    user_id,
                    size = doc.file_size,
                    "stored upload '{}'",
                    file.name
                );
            }
            Err(e) => {
                tracing::warn!(document_id = %id, file = %file.name, "upload failed: {e}");
                self.tracker.fail(&id, e.to_string());
                // The folder count is only bumped on success, so a failed
                // document stays unfiled.
                doc.folder_id = None;
                doc.status = DocumentStatus::Error;
                doc.updated_at = Utc::now();
                if let Err(e) = self.documents.update(doc.clone()).await {
                    tracing::warn!(document_id = %id, "could not record failed upload: {e}");
                }
            }
        }

        doc
    }

    /// Insert, store and extract one file. The folder count is adjusted last.
    async fn store_file(&self, doc: &mut Document, file: &IncomingFile) -> Result<(), AppError> {
        self.documents.insert(doc.clone()).await?;

        self.storage
            .put_object(&doc.storage_key, file.bytes.clone(), file.content_type())
            .await?;

        self.tracker.advance(&doc.id, 99);
        self.tracker.mark_processing(&doc.id);
        doc.status = DocumentStatus::Processing;
        self.documents.update(doc.clone()).await?;

        doc.content = extract_text(&file.name, &file.mime, &file.bytes);
        doc.preview = Some(plain_preview(&doc.content, PREVIEW_CHARS));
        doc.status = DocumentStatus::Ready;
        doc.updated_at = Utc::now();
        self.documents.update(doc.clone()).await?;

        if let Some(folder_id) = &doc.folder_id {
            self.folders.adjust_document_count(folder_id, 1).await?;
        }
        Ok(())
    }
}
