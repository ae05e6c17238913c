//! Pre-upload checks on file names, sizes and types.
//!
//! Runs in the browser before the request is sent and again on the server
//! before anything is stored, so both sides report the same messages.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AppError;

const MIB: u64 = 1024 * 1024;

const MIME_PDF: &str = "application/pdf";
const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const MIME_DOC: &str = "application/msword";

/// Limits applied to an upload batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileValidationConfig {
    pub max_size: u64,
    pub allowed_types: Vec<String>,
    /// Lowercase, dot-prefixed extensions such as `.pdf`.
    pub allowed_extensions: Vec<String>,
    pub max_files: usize,
}

impl Default for FileValidationConfig {
    fn default() -> Self {
        Self {
            max_size: 50 * MIB,
            allowed_types: [
                MIME_PDF,
                MIME_DOCX,
                MIME_DOC,
                "text/plain",
                "text/markdown",
                "application/rtf",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            allowed_extensions: [".pdf", ".docx", ".doc", ".txt", ".md", ".rtf"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_files: 10,
        }
    }
}

/// The parts of a selected file that validation looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    pub size: u64,
    /// MIME type as reported by the browser; empty when unknown.
    pub mime: String,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size: u64, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime: mime.into(),
        }
    }
}

/// A rejected file or batch. The message is shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.0)
    }
}

/// Accepted files come back with the warnings collected along the way.
pub type ValidationResult = Result<Vec<String>, ValidationError>;

fn to_mb(bytes: u64) -> u64 {
    (bytes as f64 / MIB as f64).round() as u64
}

/// Dot-prefixed, lowercased text after the last `.`; the whole name when
/// there is no dot.
pub fn extension_of(file_name: &str) -> String {
    let last = file_name.rsplit('.').next().unwrap_or_default();
    format!(".{}", last.to_lowercase())
}

/// Extensions a known MIME type is expected to come with.
fn expected_extensions(mime: &str) -> &'static [&'static str] {
    match mime {
        MIME_PDF => &[".pdf"],
        MIME_DOCX => &[".docx"],
        MIME_DOC => &[".doc"],
        "text/plain" => &[".txt"],
        "text/markdown" => &[".md"],
        "application/rtf" => &[".rtf"],
        "" => &[".pdf", ".docx", ".doc", ".txt", ".md", ".rtf"],
        _ => &[],
    }
}

pub fn validate_file(file: &FileDescriptor, config: &FileValidationConfig) -> ValidationResult {
    let mut warnings = Vec::new();

    if file.size > config.max_size {
        return Err(ValidationError(format!(
            "File \"{}\" is too large ({}MB). Maximum size is {}MB.",
            file.name,
            to_mb(file.size),
            to_mb(config.max_size)
        )));
    }

    if file.size == 0 {
        return Err(ValidationError(format!("File \"{}\" is empty.", file.name)));
    }

    let extension = extension_of(&file.name);
    if !config.allowed_extensions.contains(&extension) {
        return Err(ValidationError(format!(
            "File type \"{}\" is not supported. Allowed types: {}",
            extension,
            config.allowed_extensions.join(", ")
        )));
    }

    if !file.mime.is_empty()
        && !config.allowed_types.contains(&file.mime)
        && !expected_extensions(&file.mime).contains(&extension.as_str())
    {
        warnings.push(format!(
            "File \"{}\" has unexpected MIME type \"{}\" for extension \"{}\"",
            file.name, file.mime, extension
        ));
    }

    if file.name.contains("..") || file.name.contains('/') || file.name.contains('\\') {
        return Err(ValidationError(format!(
            "File name \"{}\" contains invalid characters.",
            file.name
        )));
    }

    let name_len = file.name.chars().count();
    if name_len > 100 {
        warnings.push(format!(
            "File name \"{}\" is very long ({} characters). Consider shortening it.",
            file.name, name_len
        ));
    }

    Ok(warnings)
}

pub fn validate_files(files: &[FileDescriptor], config: &FileValidationConfig) -> ValidationResult {
    if config.max_files > 0 && files.len() > config.max_files {
        return Err(ValidationError(format!(
            "Too many files selected ({}). Maximum is {} files.",
            files.len(),
            config.max_files
        )));
    }

    // A batch may carry up to five times the single-file limit.
    let total_size: u64 = files.iter().map(|f| f.size).sum();
    let total_limit = config.max_size * files.len().min(5) as u64;
    if total_size > total_limit {
        return Err(ValidationError(format!(
            "Total size of all files ({}MB) exceeds the limit ({}MB).",
            to_mb(total_size),
            to_mb(total_limit)
        )));
    }

    let mut warnings = Vec::new();
    for file in files {
        warnings.extend(validate_file(file, config)?);
    }

    let mut duplicates: Vec<&str> = Vec::new();
    for (i, file) in files.iter().enumerate() {
        let seen_before = files[..i].iter().any(|f| f.name == file.name);
        if seen_before && !duplicates.contains(&file.name.as_str()) {
            duplicates.push(&file.name);
        }
    }
    if !duplicates.is_empty() {
        warnings.push(format!(
            "Duplicate file names detected: {}",
            duplicates.join(", ")
        ));
    }

    Ok(warnings)
}

/// Human-readable size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let k = 1024_f64;
    let bytes = bytes as f64;
    let i = ((bytes.ln() / k.ln()).floor() as usize).min(UNITS.len() - 1);
    let value = (bytes / k.powi(i as i32) * 10.0).round() / 10.0;
    format!("{} {}", value, UNITS[i])
}

pub fn file_type_label(file_name: &str) -> &'static str {
    match extension_of(file_name).as_str() {
        ".pdf" => "PDF Document",
        ".docx" => "Word Document",
        ".doc" => "Word Document (Legacy)",
        ".txt" => "Text File",
        ".md" => "Markdown File",
        ".rtf" => "Rich Text Format",
        _ => "Unknown File Type",
    }
}

pub fn is_text_file(name: &str, mime: &str) -> bool {
    mime.starts_with("text/") || name.ends_with(".md") || name.ends_with(".txt")
}

pub fn is_pdf_file(name: &str, mime: &str) -> bool {
    mime == MIME_PDF || name.ends_with(".pdf")
}

pub fn is_word_file(name: &str, mime: &str) -> bool {
    mime == MIME_DOCX || mime == MIME_DOC || name.ends_with(".docx") || name.ends_with(".doc")
}
