use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::middleware::CurrentUser;
use crate::db::models::{Document, DocumentFilter, MoveDocumentRequest, UpdateDocumentRequest};
use crate::error::AppError;
use crate::rendering::markdown::plain_preview;
use crate::state::AppState;
use crate::store::{matches_query, DocumentPatch};
use crate::upload::pipeline::PREVIEW_CHARS;

/// Query parameters of `GET /api/v1/documents`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// `all` (default), `unfiled`, or a folder id.
    pub folder: Option<String>,
    /// Free-text search over title, content, file name and tags.
    pub q: Option<String>,
}

pub async fn list_documents(
    state: &AppState,
    user_id: &str,
    filter: &DocumentFilter,
    query: Option<&str>,
) -> Result<Vec<Document>, AppError> {
    let docs = state.document_repo.list_for_user(user_id, filter).await?;
    Ok(match query {
        Some(q) if !q.trim().is_empty() => docs.into_iter().filter(|d| matches_query(d, q)).collect(),
        _ => docs,
    })
}

/// Fetch a document owned by `user_id`. Other users' documents are reported
/// as missing.
pub async fn get_document(state: &AppState, user_id: &str, id: &str) -> Result<Document, AppError> {
    state
        .document_repo
        .find_by_id(id)
        .await?
        .filter(|d| d.user_id == user_id)
        .ok_or_else(|| AppError::NotFound(format!("Document '{}' not found", id)))
}

pub async fn update_document(
    state: &AppState,
    user_id: &str,
    id: &str,
    req: UpdateDocumentRequest,
) -> Result<Document, AppError> {
    let mut doc = get_document(state, user_id, id).await?;

    let title = match req.title {
        Some(title) if title.trim().is_empty() => {
            return Err(AppError::BadRequest("Title cannot be empty".into()));
        }
        Some(title) => Some(title.trim().to_string()),
        None => None,
    };

    if let Some(content) = &req.content {
        doc.preview = Some(plain_preview(content, PREVIEW_CHARS));
    }

    DocumentPatch {
        title,
        content: req.content,
        tags: req.tags,
        ..Default::default()
    }
    .apply(&mut doc);

    state.document_repo.update(doc.clone()).await?;
    tracing::info!(document_id = %doc.id, "document updated");
    Ok(doc)
}

/// Move a document into `folder_id`, or out of any folder when `None`.
pub async fn move_document(
    state: &AppState,
    user_id: &str,
    id: &str,
    folder_id: Option<String>,
) -> Result<Document, AppError> {
    let mut doc = get_document(state, user_id, id).await?;

    if let Some(target) = folder_id.as_deref() {
        crate::api::folders::owned_folder(state, user_id, target).await?;
    }

    if doc.folder_id == folder_id {
        return Ok(doc);
    }

    let previous = doc.folder_id.clone();
    DocumentPatch {
        folder_id: Some(folder_id.clone()),
        ..Default::default()
    }
    .apply(&mut doc);
    state.document_repo.update(doc.clone()).await?;

    if let Some(previous) = previous {
        state.folder_repo.adjust_document_count(&previous, -1).await?;
    }
    if let Some(target) = folder_id {
        state.folder_repo.adjust_document_count(&target, 1).await?;
    }

    Ok(doc)
}

/// Delete a document and, on a best-effort basis, its stored original.
pub async fn delete_document(state: &AppState, user_id: &str, id: &str) -> Result<(), AppError> {
    let doc = get_document(state, user_id, id).await?;

    if let Err(e) = state.storage_client.delete_object(&doc.storage_key).await {
        tracing::warn!(document_id = %doc.id, key = %doc.storage_key, "failed to delete stored file: {e}");
    }

    if !state.document_repo.delete(&doc.id).await? {
        return Err(AppError::NotFound(format!("Document '{}' not found", id)));
    }

    if let Some(folder_id) = &doc.folder_id {
        state.folder_repo.adjust_document_count(folder_id, -1).await?;
    }

    state.presence.close(&doc.id);
    state.uploads.remove(&doc.id);
    tracing::info!(document_id = %doc.id, "document deleted");
    Ok(())
}

/// `GET /api/v1/documents?folder=&q=`
pub async fn list_documents_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Document>>, AppError> {
    let filter = DocumentFilter::from_query(query.folder.as_deref());
    list_documents(&state, &user.user_id, &filter, query.q.as_deref())
        .await
        .map(Json)
}

/// `GET /api/v1/documents/{id}`
pub async fn get_document_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Document>, AppError> {
    get_document(&state, &user.user_id, &id).await.map(Json)
}

/// `PATCH /api/v1/documents/{id}`
pub async fn update_document_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateDocumentRequest>,
) -> Result<Json<Document>, AppError> {
    update_document(&state, &user.user_id, &id, req).await.map(Json)
}

/// `PUT /api/v1/documents/{id}/folder`
pub async fn move_document_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<MoveDocumentRequest>,
) -> Result<Json<Document>, AppError> {
    move_document(&state, &user.user_id, &id, req.folder_id).await.map(Json)
}

/// `DELETE /api/v1/documents/{id}`
pub async fn delete_document_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    delete_document(&state, &user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::folders::create_folder;
    use crate::db::models::{CreateFolderRequest, DocumentStatus, LensSet};
    use crate::storage::client::{MockStorageClient, StorageClient};
    use crate::upload::pipeline::IncomingFile;
    use chrono::Utc;
    use std::sync::Arc;

    fn incoming(name: &str) -> IncomingFile {
        IncomingFile {
            name: name.to_string(),
            mime: "text/plain".to_string(),
            bytes: name.as_bytes().to_vec(),
        }
    }

    fn doc(id: &str, user: &str, folder: Option<&str>) -> Document {
        Document {
            id: id.to_string(),
            title: format!("Doc {id}"),
            content: "Quarterly numbers".to_string(),
            original_file_name: format!("{id}.md"),
            file_type: "text/markdown".to_string(),
            file_size: 17,
            storage_key: format!("users/{user}/documents/{id}/{id}.md"),
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

    async fn folder(state: &AppState, user: &str, name: &str) -> String {
        create_folder(
            state,
            user,
            CreateFolderRequest {
                name: name.to_string(),
                parent_id: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_other_users_documents_are_not_found() {
        let state = AppState::in_memory();
        state.document_repo.insert(doc("d1", "alice", None)).await.unwrap();

        assert!(get_document(&state, "alice", "d1").await.is_ok());
        let err = get_document(&state, "bob", "d1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_with_query() {
        let state = AppState::in_memory();
        state.document_repo.insert(doc("d1", "u", None)).await.unwrap();
        let mut other = doc("d2", "u", None);
        other.content = "Roadmap".to_string();
        state.document_repo.insert(other).await.unwrap();

        let hits = list_documents(&state, "u", &DocumentFilter::All, Some("quarterly")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "d1");

        let all = list_documents(&state, "u", &DocumentFilter::All, Some("  ")).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_title_and_refreshes_preview() {
        let state = AppState::in_memory();
        state.document_repo.insert(doc("d1", "u", None)).await.unwrap();

        let err = update_document(
            &state,
            "u",
            "d1",
            UpdateDocumentRequest {
                title: Some("  ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let updated = update_document(
            &state,
            "u",
            "d1",
            UpdateDocumentRequest {
                title: Some(" Renamed ".to_string()),
                content: Some("# New\n\nBody".to_string()),
                tags: Some(vec!["q3".to_string()]),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.preview.as_deref(), Some("New Body"));
        assert_eq!(updated.tags, vec!["q3"]);
    }

    #[tokio::test]
    async fn test_move_adjusts_both_counts() {
        let state = AppState::in_memory();
        let a = folder(&state, "u", "A").await;
        let b = folder(&state, "u", "B").await;
        state.document_repo.insert(doc("d1", "u", Some(&a))).await.unwrap();
        state.folder_repo.adjust_document_count(&a, 1).await.unwrap();

        let moved = move_document(&state, "u", "d1", Some(b.clone())).await.unwrap();
        assert_eq!(moved.folder_id.as_deref(), Some(b.as_str()));

        let count = |id: String| {
            let state = state.clone();
            async move { state.folder_repo.find_by_id(&id).await.unwrap().unwrap().document_count }
        };
        assert_eq!(count(a.clone()).await, 0);
        assert_eq!(count(b.clone()).await, 1);

        move_document(&state, "u", "d1", None).await.unwrap();
        assert_eq!(count(b).await, 0);
    }

    #[tokio::test]
    async fn test_move_into_foreign_folder_fails() {
        let state = AppState::in_memory();
        let theirs = folder(&state, "other", "Theirs").await;
        state.document_repo.insert(doc("d1", "u", None)).await.unwrap();

        let err = move_document(&state, "u", "d1", Some(theirs)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_blob_and_decrements_count() {
        let state = AppState::in_memory();
        let f = folder(&state, "u", "Research").await;
        let d = doc("d1", "u", Some(&f));
        state
            .storage_client
            .put_object(&d.storage_key, b"x".to_vec(), "text/markdown")
            .await
            .unwrap();
        state.document_repo.insert(d.clone()).await.unwrap();
        state.folder_repo.adjust_document_count(&f, 1).await.unwrap();

        delete_document(&state, "u", "d1").await.unwrap();

        assert!(state.storage_client.get_object(&d.storage_key).await.unwrap().is_none());
        assert!(state.document_repo.find_by_id("d1").await.unwrap().is_none());
        let folder = state.folder_repo.find_by_id(&f).await.unwrap().unwrap();
        assert_eq!(folder.document_count, 0);
    }

    #[tokio::test]
    async fn test_delete_forgets_upload_progress() {
        let state = AppState::in_memory();
        let outcome = state
            .upload_pipeline()
            .process_upload("u", None, vec![incoming("a.txt")])
            .await
            .unwrap();
        let id = outcome.documents[0].id.clone();
        assert!(state.uploads.get(&id).is_some());

        delete_document(&state, "u", &id).await.unwrap();

        assert!(state.uploads.is_empty());
    }

    #[tokio::test]
    async fn test_deleting_failed_upload_keeps_folder_count() {
        let mut state = AppState::in_memory();
        let mut storage = MockStorageClient::new();
        storage.expect_put_object().returning(|key, _, _| {
            if key.ends_with("broken.txt") {
                Err(AppError::Storage("bucket unavailable".into()))
            } else {
                Ok(())
            }
        });
        storage.expect_delete_object().returning(|_| Ok(()));
        state.storage_client = Arc::new(storage);
        let f = folder(&state, "u", "Research").await;

        let outcome = state
            .upload_pipeline()
            .process_upload("u", Some(f.as_str()), vec![incoming("broken.txt"), incoming("fine.txt")])
            .await
            .unwrap();
        let broken = &outcome.documents[0];
        assert_eq!(broken.status, DocumentStatus::Error);

        delete_document(&state, "u", &broken.id).await.unwrap();

        let remaining = list_documents(&state, "u", &DocumentFilter::InFolder(f.clone()), None)
            .await
            .unwrap();
        let folder = state.folder_repo.find_by_id(&f).await.unwrap().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(folder.document_count, 1);
    }
}
