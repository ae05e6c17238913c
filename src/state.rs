use std::sync::Arc;

use axum::extract::FromRef;
use leptos::prelude::LeptosOptions;

use crate::collaboration::PresenceRegistry;
use crate::config::{Settings, StorageBackend};
use crate::db::folder_repository::{FolderRepository, MongoFolderRepository};
use crate::db::memory::{shared_store, MemoryDocumentRepository, MemoryFolderRepository};
use crate::db::repository::{DocumentRepository, MongoDocumentRepository};
use crate::error::AppError;
use crate::storage::client::{MemoryStorage, S3StorageClient, StorageClient};
use crate::upload::pipeline::UploadPipeline;
use crate::upload::progress::ProgressTracker;
use crate::upload::validation::FileValidationConfig;

/// Shared application state, available to every handler and server function.
#[derive(Clone)]
pub struct AppState {
    pub document_repo: Arc<dyn DocumentRepository>,
    pub folder_repo: Arc<dyn FolderRepository>,
    pub storage_client: Arc<dyn StorageClient>,
    pub uploads: Arc<ProgressTracker>,
    pub presence: Arc<PresenceRegistry>,
    pub validation: FileValidationConfig,
    pub demo_mode: bool,
    pub leptos_options: LeptosOptions,
}

impl FromRef<AppState> for LeptosOptions {
    fn from_ref(state: &AppState) -> Self {
        state.leptos_options.clone()
    }
}

impl AppState {
    /// State backed entirely by memory: demo mode and tests.
    pub fn in_memory() -> Self {
        Self::in_memory_with(
            LeptosOptions::builder().output_name("grasp").build(),
            FileValidationConfig::default(),
        )
    }

    pub fn in_memory_with(leptos_options: LeptosOptions, validation: FileValidationConfig) -> Self {
        let store = shared_store();
        Self {
            document_repo: Arc::new(MemoryDocumentRepository::new(store.clone())),
            folder_repo: Arc::new(MemoryFolderRepository::new(store)),
            storage_client: Arc::new(MemoryStorage::new()),
            uploads: Arc::new(ProgressTracker::new()),
            presence: Arc::new(PresenceRegistry::new()),
            validation,
            demo_mode: true,
            leptos_options,
        }
    }

    /// Connect to the configured backends.
    ///
    /// Demo mode always runs on memory backends so it works without MongoDB
    /// or S3.
    pub async fn from_settings(
        settings: &Settings,
        leptos_options: LeptosOptions,
    ) -> Result<Self, AppError> {
        let validation = settings.upload.validation_config();

        if settings.server.demo_mode {
            tracing::info!("demo mode: using in-memory repositories and storage");
            return Ok(Self::in_memory_with(leptos_options, validation));
        }

        let mongo_client = mongodb::Client::with_uri_str(&settings.mongodb.uri)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to MongoDB: {e}")))?;
        let database = mongo_client.database(&settings.database_name());
        tracing::info!(database = %database.name(), "connected to MongoDB");

        let storage_client: Arc<dyn StorageClient> = match settings.storage.backend {
            StorageBackend::S3 => {
                let bucket = settings.bucket()?;
                tracing::info!(%bucket, "using S3 storage");
                Arc::new(S3StorageClient::from_settings(&settings.storage, bucket).await)
            }
            StorageBackend::Memory => {
                tracing::warn!("storage backend is in-memory; uploads are lost on restart");
                Arc::new(MemoryStorage::new())
            }
        };

        Ok(Self {
            document_repo: Arc::new(MongoDocumentRepository::new(&database)),
            folder_repo: Arc::new(MongoFolderRepository::new(&database)),
            storage_client,
            uploads: Arc::new(ProgressTracker::new()),
            presence: Arc::new(PresenceRegistry::new()),
            validation,
            demo_mode: false,
            leptos_options,
        })
    }

    pub fn upload_pipeline(&self) -> UploadPipeline<'_> {
        UploadPipeline {
            documents: self.document_repo.as_ref(),
            folders: self.folder_repo.as_ref(),
            storage: self.storage_client.as_ref(),
            tracker: self.uploads.as_ref(),
            config: &self.validation,
        }
    }
}
