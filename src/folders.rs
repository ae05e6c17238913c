//! Folder hierarchy helpers shared by the API and the sidebar.

use std::collections::HashMap;

use crate::db::models::{Folder, FolderNode};
use crate::error::AppError;

pub const MAX_FOLDER_NAME_CHARS: usize = 100;

/// Trimmed folder name, or a `BadRequest` when empty or too long.
pub fn validate_folder_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Folder name cannot be empty".into()));
    }
    if name.chars().count() > MAX_FOLDER_NAME_CHARS {
        return Err(AppError::BadRequest(format!(
            "Folder name cannot be longer than {MAX_FOLDER_NAME_CHARS} characters"
        )));
    }
    Ok(name.to_string())
}

/// Nest a flat folder list by `parent_id`.
///
/// Folders whose parent is unknown are treated as roots. Folders caught in
/// a parent cycle have no root and are left out. Siblings are sorted by name.
pub fn build_folder_tree(folders: &[Folder]) -> Vec<FolderNode> {
    let known: std::collections::HashSet<&str> = folders.iter().map(|f| f.id.as_str()).collect();

    let mut children: HashMap<Option<&str>, Vec<&Folder>> = HashMap::new();
    for folder in folders {
        let parent = folder
            .parent_id
            .as_deref()
            .filter(|p| known.contains(p) && *p != folder.id);
        children.entry(parent).or_default().push(folder);
    }

    fn build<'a>(
        parent: Option<&'a str>,
        children: &HashMap<Option<&'a str>, Vec<&'a Folder>>,
    ) -> Vec<FolderNode> {
        let mut nodes: Vec<FolderNode> = children
            .get(&parent)
            .map(|list| {
                list.iter()
                    .map(|f| FolderNode {
                        id: f.id.clone(),
                        name: f.name.clone(),
                        document_count: f.document_count,
                        children: build(Some(f.id.as_str()), children),
                    })
                    .collect()
            })
            .unwrap_or_default();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        nodes
    }

    build(None, &children)
}

/// Folders from the root down to `folder_id`, for breadcrumbs.
pub fn folder_path(folders: &[Folder], folder_id: &str) -> Vec<Folder> {
    let mut path = Vec::new();
    let mut current = Some(folder_id.to_string());

    while let Some(id) = current {
        let Some(folder) = folders.iter().find(|f| f.id == id) else {
            break;
        };
        if path.iter().any(|f: &Folder| f.id == folder.id) {
            break;
        }
        current = folder.parent_id.clone();
        path.push(folder.clone());
    }

    path.reverse();
    path
}
