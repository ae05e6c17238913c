use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use crate::auth::middleware::CurrentUser;
use crate::db::models::{CreateFolderRequest, Folder, FolderNode, RenameFolderRequest};
use crate::error::AppError;
use crate::folders::{build_folder_tree, validate_folder_name};
use crate::state::AppState;

/// Fetch a folder owned by `user_id`; anything else is reported as missing.
pub async fn owned_folder(state: &AppState, user_id: &str, id: &str) -> Result<Folder, AppError> {
    state
        .folder_repo
        .find_by_id(id)
        .await?
        .filter(|f| f.user_id == user_id)
        .ok_or_else(|| AppError::NotFound(format!("Folder '{}' not found", id)))
}

pub async fn list_folders(state: &AppState, user_id: &str) -> Result<Vec<Folder>, AppError> {
    state.folder_repo.list_for_user(user_id).await
}

pub async fn folder_tree(state: &AppState, user_id: &str) -> Result<Vec<FolderNode>, AppError> {
    let folders = list_folders(state, user_id).await?;
    Ok(build_folder_tree(&folders))
}

pub async fn create_folder(
    state: &AppState,
    user_id: &str,
    req: CreateFolderRequest,
) -> Result<Folder, AppError> {
    let name = validate_folder_name(&req.name)?;

    let parent_id = match req.parent_id.filter(|p| !p.is_empty()) {
        Some(parent) => Some(owned_folder(state, user_id, &parent).await?.id),
        None => None,
    };

    let now = Utc::now();
    let folder = Folder {
        id: uuid::Uuid::new_v4().to_string(),
        name,
        user_id: user_id.to_string(),
        parent_id,
        document_count: 0,
        created_at: now,
        updated_at: now,
    };

    state.folder_repo.insert(folder.clone()).await?;
    tracing::info!(folder_id = %folder.id, user_id, "created folder '{}'", folder.name);
    Ok(folder)
}

pub async fn rename_folder(
    state: &AppState,
    user_id: &str,
    id: &str,
    name: &str,
) -> Result<Folder, AppError> {
    let mut folder = owned_folder(state, user_id, id).await?;
    folder.name = validate_folder_name(name)?;
    folder.updated_at = Utc::now();
    state.folder_repo.update(folder.clone()).await?;
    Ok(folder)
}

/// Delete a folder. Its documents become unfiled and its sub-folders move up
/// to the deleted folder's parent.
pub async fn delete_folder(state: &AppState, user_id: &str, id: &str) -> Result<(), AppError> {
    let folder = owned_folder(state, user_id, id).await?;

    let unfiled = state.document_repo.unfile_folder(user_id, &folder.id).await?;
    let moved = state
        .folder_repo
        .reparent_children(user_id, &folder.id, folder.parent_id.as_deref())
        .await?;
    state.folder_repo.delete(&folder.id).await?;

    tracing::info!(
        folder_id = %folder.id,
        unfiled,
        moved,
        "deleted folder '{}'",
        folder.name
    );
    Ok(())
}

/// `GET /api/v1/folders`
pub async fn list_folders_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Folder>>, AppError> {
    list_folders(&state, &user.user_id).await.map(Json)
}

/// `GET /api/v1/folders/tree`
pub async fn folder_tree_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<FolderNode>>, AppError> {
    folder_tree(&state, &user.user_id).await.map(Json)
}

/// `POST /api/v1/folders`
pub async fn create_folder_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<Folder>), AppError> {
    let folder = create_folder(&state, &user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

/// `PATCH /api/v1/folders/{id}`
pub async fn rename_folder_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<RenameFolderRequest>,
) -> Result<Json<Folder>, AppError> {
    rename_folder(&state, &user.user_id, &id, &req.name).await.map(Json)
}

/// `DELETE /api/v1/folders/{id}`
pub async fn delete_folder_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    delete_folder(&state, &user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Document, DocumentFilter, DocumentStatus, LensSet};

    fn request(name: &str, parent: Option<&str>) -> CreateFolderRequest {
        CreateFolderRequest {
            name: name.to_string(),
            parent_id: parent.map(str::to_string),
        }
    }

    fn doc_in(id: &str, folder: &str) -> Document {
        Document {
            id: id.to_string(),
            title: id.to_string(),
            content: String::new(),
            original_file_name: format!("{id}.txt"),
            file_type: "text/plain".to_string(),
            file_size: 1,
            storage_key: format!("users/u/documents/{id}/{id}.txt"),
            user_id: "u".to_string(),
            folder_id: Some(folder.to_string()),
            tags: vec![],
            lenses: LensSet::default(),
            status: DocumentStatus::Ready,
            preview: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_trims_and_appears_in_tree() {
        let state = AppState::in_memory();
        let parent = create_folder(&state, "u", request("  Strategy ", None)).await.unwrap();
        assert_eq!(parent.name, "Strategy");
        create_folder(&state, "u", request("Planning", Some(&parent.id))).await.unwrap();

        let tree = folder_tree(&state, "u").await.unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children[0].name, "Planning");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_names_and_foreign_parent() {
        let state = AppState::in_memory();
        assert!(matches!(
            create_folder(&state, "u", request("   ", None)).await,
            Err(AppError::BadRequest(_))
        ));

        let theirs = create_folder(&state, "other", request("Theirs", None)).await.unwrap();
        assert!(matches!(
            create_folder(&state, "u", request("Mine", Some(&theirs.id))).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rename() {
        let state = AppState::in_memory();
        let folder = create_folder(&state, "u", request("Old", None)).await.unwrap();
        let renamed = rename_folder(&state, "u", &folder.id, "New").await.unwrap();
        assert_eq!(renamed.name, "New");
        assert!(rename_folder(&state, "intruder", &folder.id, "Mine").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_unfiles_documents_and_lifts_children() {
        let state = AppState::in_memory();
        let root = create_folder(&state, "u", request("Strategy", None)).await.unwrap();
        let mid = create_folder(&state, "u", request("Quarterly", Some(&root.id))).await.unwrap();
        let leaf = create_folder(&state, "u", request("Q3", Some(&mid.id))).await.unwrap();
        state.document_repo.insert(doc_in("d1", &mid.id)).await.unwrap();

        delete_folder(&state, "u", &mid.id).await.unwrap();

        let leaf = state.folder_repo.find_by_id(&leaf.id).await.unwrap().unwrap();
        assert_eq!(leaf.parent_id.as_deref(), Some(root.id.as_str()));

        let unfiled = state
            .document_repo
            .list_for_user("u", &DocumentFilter::Unfiled)
            .await
            .unwrap();
        assert_eq!(unfiled.len(), 1);
        assert!(state.folder_repo.find_by_id(&mid.id).await.unwrap().is_none());
    }
}
