use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::AppError;

/// Trait for blob storage operations (S3-compatible).
///
/// Abstracted as a trait so tests can use a mock without a real S3 instance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Upload content to the given key.
    async fn put_object(
        &self,
        key: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), AppError>;

    /// Retrieve content by key. Returns `None` if the object doesn't exist.
    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, AppError>;

    /// Delete the object stored at `key`. Deleting a missing key succeeds.
    async fn delete_object(&self, key: &str) -> Result<(), AppError>;
}

/// Object key for an uploaded original: `users/{user}/documents/{id}/{name}`.
pub fn document_key(user_id: &str, document_id: &str, file_name: &str) -> String {
    let sanitized_name = file_name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect::<String>();
    format!("users/{user_id}/documents/{document_id}/{sanitized_name}")
}

/// S3 implementation of StorageClient.
///
/// Only available when the `ssr` feature is enabled.
#[cfg(feature = "ssr")]
pub struct S3StorageClient {
    client: aws_sdk_s3::Client,
    bucket: String,
}

#[cfg(feature = "ssr")]
impl S3StorageClient {
    /// Create a client for `bucket` using the region and optional custom
    /// endpoint from the storage settings. Credentials come from the usual
    /// AWS environment chain.
    pub async fn from_settings(
        settings: &crate::config::StorageSettings,
        bucket: String,
    ) -> Self {
        let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(settings.region.clone()));

        if let Some(endpoint) = &settings.endpoint {
            config_loader = config_loader.endpoint_url(endpoint);
        }

        let sdk_config = config_loader.load().await;

        // MinIO and LocalStack only understand path-style addressing
        let client = aws_sdk_s3::Client::from_conf(
            aws_sdk_s3::config::Builder::from(&sdk_config)
                .force_path_style(settings.endpoint.is_some())
                .build(),
        );

        Self { client, bucket }
    }

    /// Create with explicit values (useful for testing / DI).
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[cfg(feature = "ssr")]
#[async_trait]
impl StorageClient for S3StorageClient {
    async fn put_object(
        &self,
        key: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(content.into())
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to put object '{}': {}", key, e)))?;

        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => {
                let bytes = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| AppError::Storage(format!("Failed to read body: {}", e)))?;
                Ok(Some(bytes.into_bytes().to_vec()))
            }
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    Ok(None)
                } else {
                    Err(AppError::Storage(format!(
                        "Failed to get object '{}': {}",
                        key, service_err
                    )))
                }
            }
        }
    }

    async fn delete_object(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete object '{}': {}", key, e)))?;

        Ok(())
    }
}

/// Storage kept in process memory, used in demo mode and tests.
#[derive(Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::Storage("memory storage lock poisoned".into())
}

#[async_trait]
impl StorageClient for MemoryStorage {
    async fn put_object(
        &self,
        key: &str,
        content: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), AppError> {
        self.objects
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), content);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        Ok(self.objects.read().map_err(poisoned)?.get(key).cloned())
    }

    async fn delete_object(&self, key: &str) -> Result<(), AppError> {
        self.objects.write().map_err(poisoned)?.remove(key);
        Ok(())
    }
}
