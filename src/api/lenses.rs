use axum::extract::{Path, State};
use axum::Json;

use crate::api::documents::get_document;
use crate::auth::middleware::CurrentUser;
use crate::db::models::{Document, LensResponse, LensUpdateRequest};
use crate::error::AppError;
use crate::lens::{
    all_lenses, definition, is_lens_available, lens_content, update_lens_content, LensDefinition,
    LensKind,
};
use crate::state::AppState;

pub fn parse_kind(raw: &str) -> Result<LensKind, AppError> {
    LensKind::from_str_ci(raw).ok_or_else(|| AppError::BadRequest(format!("Unknown lens '{raw}'")))
}

fn ensure_available(kind: LensKind) -> Result<(), AppError> {
    if is_lens_available(kind) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "The {} lens is not available yet",
            definition(kind).name
        )))
    }
}

fn response(doc: &Document, kind: LensKind) -> LensResponse {
    LensResponse {
        document_id: doc.id.clone(),
        kind,
        content: lens_content(doc, kind),
        stored: doc.lenses.get(kind).is_some_and(|c| !c.is_empty()),
    }
}

pub async fn get_lens(
    state: &AppState,
    user_id: &str,
    document_id: &str,
    kind: LensKind,
) -> Result<LensResponse, AppError> {
    ensure_available(kind)?;
    let doc = get_document(state, user_id, document_id).await?;
    Ok(response(&doc, kind))
}

pub async fn save_lens(
    state: &AppState,
    user_id: &str,
    document_id: &str,
    kind: LensKind,
    content: String,
) -> Result<LensResponse, AppError> {
    ensure_available(kind)?;
    let doc = get_document(state, user_id, document_id).await?;
    let doc = update_lens_content(doc, kind, content);
    state.document_repo.update(doc.clone()).await?;
    Ok(response(&doc, kind))
}

/// `GET /api/v1/lenses`
pub async fn list_lenses_handler() -> Json<Vec<LensDefinition>> {
    Json(all_lenses())
}

/// `GET /api/v1/documents/{id}/lenses/{kind}`
pub async fn get_lens_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, kind)): Path<(String, String)>,
) -> Result<Json<LensResponse>, AppError> {
    let kind = parse_kind(&kind)?;
    get_lens(&state, &user.user_id, &id, kind).await.map(Json)
}

/// `PUT /api/v1/documents/{id}/lenses/{kind}`
pub async fn save_lens_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, kind)): Path<(String, String)>,
    Json(req): Json<LensUpdateRequest>,
) -> Result<Json<LensResponse>, AppError> {
    let kind = parse_kind(&kind)?;
    save_lens(&state, &user.user_id, &id, kind, req.content).await.map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{DocumentStatus, LensSet};
    use chrono::Utc;

    fn doc() -> Document {
        Document {
            id: "d1".to_string(),
            title: "Market Analysis Report".to_string(),
            content: String::new(),
            original_file_name: "market.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            file_size: 10,
            storage_key: "users/u/documents/d1/market.pdf".to_string(),
            user_id: "u".to_string(),
            folder_id: None,
            tags: vec![],
            lenses: LensSet::default(),
            status: DocumentStatus::Ready,
            preview: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("Study").unwrap(), LensKind::Study);
        assert!(matches!(parse_kind("poem"), Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_generated_then_stored() {
        let state = AppState::in_memory();
        state.document_repo.insert(doc()).await.unwrap();

        let generated = get_lens(&state, "u", "d1", LensKind::Slide).await.unwrap();
        assert!(!generated.stored);
        assert!(generated.content.starts_with("# Market Analysis Report"));

        save_lens(&state, "u", "d1", LensKind::Slide, "<p>My slides</p>".to_string())
            .await
            .unwrap();
        let stored = get_lens(&state, "u", "d1", LensKind::Slide).await.unwrap();
        assert!(stored.stored);
        assert_eq!(stored.content, "<p>My slides</p>");
    }

    #[tokio::test]
    async fn test_locked_lens_is_forbidden() {
        let state = AppState::in_memory();
        state.document_repo.insert(doc()).await.unwrap();

        let err = get_lens(&state, "u", "d1", LensKind::Faq).await.unwrap_err();
        assert_eq!(err.to_string(), "Forbidden: The FAQ Sheet lens is not available yet");
        assert!(save_lens(&state, "u", "d1", LensKind::Scholar, "x".into()).await.is_err());
    }
}
