//! Layered server configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. an optional `grasp.toml` in the working directory
//! 3. environment variables prefixed with `GRASP__`, e.g. `GRASP__MONGODB__URI`

use serde::Deserialize;

use crate::error::AppError;
use crate::upload::validation::FileValidationConfig;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub mongodb: MongoSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub upload: UploadSettings,
    #[serde(default)]
    pub project: ProjectIdentity,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSettings {
    /// Use in-memory backends, demo users and seeded content.
    #[serde(default)]
    pub demo_mode: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoSettings {
    #[serde(default = "default_mongo_uri")]
    pub uri: String,
    /// Falls back to `project.project_id` when unset.
    #[serde(default)]
    pub database: Option<String>,
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            uri: default_mongo_uri(),
            database: None,
        }
    }
}

fn default_mongo_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    S3,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Custom endpoint for MinIO / LocalStack.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            endpoint: None,
            region: default_region(),
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    #[serde(default = "default_max_size")]
    pub max_size: u64,
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            max_files: default_max_files(),
        }
    }
}

fn default_max_size() -> u64 {
    50 * 1024 * 1024
}

fn default_max_files() -> usize {
    10
}

impl UploadSettings {
    pub fn validation_config(&self) -> FileValidationConfig {
        FileValidationConfig {
            max_size: self.max_size,
            max_files: self.max_files,
            ..FileValidationConfig::default()
        }
    }
}

/// Identity of the hosted project the deployment belongs to.
///
/// All six keys must be present; obviously unfilled values are tolerated with
/// a warning so local setups keep working.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectIdentity {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
}

impl ProjectIdentity {
    fn entries(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("api_key", self.api_key.as_deref()),
            ("auth_domain", self.auth_domain.as_deref()),
            ("project_id", self.project_id.as_deref()),
            ("storage_bucket", self.storage_bucket.as_deref()),
            ("messaging_sender_id", self.messaging_sender_id.as_deref()),
            ("app_id", self.app_id.as_deref()),
        ]
    }

    /// Check that every key is set.
    ///
    /// Returns the names of keys holding placeholder values; the caller decides
    /// how loudly to report them.
    pub fn validate(&self) -> Result<Vec<&'static str>, AppError> {
        let missing: Vec<String> = self
            .entries()
            .iter()
            .filter(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
            .map(|(key, _)| format!("GRASP__PROJECT__{}", key.to_uppercase()))
            .collect();

        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "Missing required project settings: {}",
                missing.join(", ")
            )));
        }

        Ok(self
            .entries()
            .iter()
            .filter(|(_, value)| value.is_some_and(is_placeholder))
            .map(|(key, _)| *key)
            .collect())
    }
}

fn is_placeholder(value: &str) -> bool {
    value.contains("placeholder") || value.contains("your-") || value == "123456789"
}

impl Settings {
    pub fn load() -> Result<Self, AppError> {
        Self::from_builder(
            config::Config::builder()
                .add_source(config::File::with_name("grasp").required(false)),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AppError> {
        let settings = builder
            .add_source(
                config::Environment::with_prefix("GRASP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize::<Settings>()?)
    }

    /// Validate the project identity, logging placeholder values.
    pub fn check_project(&self) -> Result<(), AppError> {
        for key in self.project.validate()? {
            tracing::warn!(key, "project setting looks like a placeholder value");
        }
        Ok(())
    }

    pub fn database_name(&self) -> String {
        self.mongodb
            .database
            .clone()
            .or_else(|| self.project.project_id.clone())
            .unwrap_or_else(|| "grasp".to_string())
    }

    pub fn bucket(&self) -> Result<String, AppError> {
        self.project
            .storage_bucket
            .clone()
            .ok_or_else(|| AppError::Config("GRASP__PROJECT__STORAGE_BUCKET not set".into()))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETE: &str = r#"
        [server]
        demo_mode = true

        [upload]
        max_size = 1024

        [project]
        api_key = "AIzaReal"
        auth_domain = "grasp-now.example.com"
        project_id = "grasp-now"
        storage_bucket = "grasp-now-files"
        messaging_sender_id = "987654321"
        app_id = "1:987654321:web:abc"
    "#;

    fn from_toml(raw: &str) -> Settings {
        Settings::from_builder(
            config::Config::builder()
                .add_source(config::File::from_str(raw, config::FileFormat::Toml)),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let settings = from_toml("");
        assert!(!settings.server.demo_mode);
        assert_eq!(settings.mongodb.uri, "mongodb://localhost:27017");
        assert_eq!(settings.storage.backend, StorageBackend::S3);
        assert_eq!(settings.upload.max_size, 50 * 1024 * 1024);
        assert_eq!(settings.upload.max_files, 10);
    }

    #[test]
    fn test_file_values_and_derived_names() {
        let settings = from_toml(COMPLETE);
        assert!(settings.server.demo_mode);
        assert_eq!(settings.upload.validation_config().max_size, 1024);
        assert_eq!(settings.database_name(), "grasp-now");
        assert_eq!(settings.bucket().unwrap(), "grasp-now-files");
        assert!(settings.project.validate().unwrap().is_empty());
    }

    #[test]
    fn test_missing_project_keys_are_listed() {
        let identity = ProjectIdentity {
            api_key: Some("key".into()),
            ..Default::default()
        };
        let err = identity.validate().unwrap_err().to_string();
        assert!(err.contains("GRASP__PROJECT__AUTH_DOMAIN"));
        assert!(err.contains("GRASP__PROJECT__APP_ID"));
        assert!(!err.contains("GRASP__PROJECT__API_KEY"));
    }

    #[test]
    fn test_placeholders_are_reported_not_rejected() {
        let identity = ProjectIdentity {
            api_key: Some("your-api-key".into()),
            auth_domain: Some("placeholder.example.com".into()),
            project_id: Some("grasp".into()),
            storage_bucket: Some("bucket".into()),
            messaging_sender_id: Some("123456789".into()),
            app_id: Some("app".into()),
        };
        assert_eq!(
            identity.validate().unwrap(),
            vec!["api_key", "auth_domain", "messaging_sender_id"]
        );
    }
}
