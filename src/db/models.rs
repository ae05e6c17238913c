use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lens::LensKind;

/// Lifecycle state of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Uploading,
    Processing,
    Ready,
    Error,
}

/// Edited lens text, one optional slot per lens kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LensSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scholar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faq: Option<String>,
}

impl LensSet {
    pub fn get(&self, kind: LensKind) -> Option<&str> {
        self.slot(kind).as_deref()
    }

    pub fn set(&mut self, kind: LensKind, content: String) {
        *self.slot_mut(kind) = Some(content);
    }

    fn slot(&self, kind: LensKind) -> &Option<String> {
        match kind {
            LensKind::Slide => &self.slide,
            LensKind::Study => &self.study,
            LensKind::Story => &self.story,
            LensKind::Scholar => &self.scholar,
            LensKind::Speed => &self.speed,
            LensKind::Faq => &self.faq,
        }
    }

    fn slot_mut(&mut self, kind: LensKind) -> &mut Option<String> {
        match kind {
            LensKind::Slide => &mut self.slide,
            LensKind::Study => &mut self.study,
            LensKind::Story => &mut self.story,
            LensKind::Scholar => &mut self.scholar,
            LensKind::Speed => &mut self.speed,
            LensKind::Faq => &mut self.faq,
        }
    }
}

/// A user's document, stored in the `documents` collection.
///
/// The original file lives in object storage under `storage_key`; the
/// extracted markdown is kept inline in `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    /// Extracted markdown content.
    pub content: String,
    pub original_file_name: String,
    /// MIME type reported at upload time (may be empty).
    pub file_type: String,
    /// Size of the original file in bytes.
    pub file_size: u64,
    pub storage_key: String,
    pub user_id: String,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub lenses: LensSet,
    pub status: DocumentStatus,
    /// Plain-text excerpt shown on document cards.
    #[serde(default)]
    pub preview: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user-defined grouping of documents, stored in the `folders` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub user_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub document_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A folder with its nested children, as rendered in the sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderNode {
    pub id: String,
    pub name: String,
    pub document_count: i64,
    pub children: Vec<FolderNode>,
}

/// Which documents a listing should include.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocumentFilter {
    #[default]
    All,
    /// Documents not assigned to any folder.
    Unfiled,
    InFolder(String),
}

impl DocumentFilter {
    /// Parse the `folder` query parameter: absent or `all`, `unfiled`, or a folder id.
    pub fn from_query(folder: Option<&str>) -> Self {
        match folder {
            None | Some("") | Some("all") => DocumentFilter::All,
            Some("unfiled") => DocumentFilter::Unfiled,
            Some(id) => DocumentFilter::InFolder(id.to_string()),
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            DocumentFilter::All => true,
            DocumentFilter::Unfiled => doc.folder_id.is_none(),
            DocumentFilter::InFolder(id) => doc.folder_id.as_deref() == Some(id.as_str()),
        }
    }
}

/// Partial update of a document's editable fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDocumentRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Move a document into a folder (`None` means unfiled).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveDocumentRequest {
    #[serde(default)]
    pub folder_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameFolderRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LensUpdateRequest {
    pub content: String,
}

/// Lens text returned by the lens endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LensResponse {
    pub document_id: String,
    pub kind: LensKind,
    pub content: String,
    /// Whether the content was edited by the user rather than generated.
    pub stored: bool,
}
