use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::documents::get_document;
use crate::auth::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::upload::pipeline::{IncomingFile, UploadOutcome};
use crate::upload::progress::UploadProgress;

/// Axum handler for `POST /api/v1/uploads`.
///
/// Accepts a multipart form with one or more `file` fields and an optional
/// `folder_id` text field.
pub async fn upload_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadOutcome>), AppError> {
    let mut files = Vec::new();
    let mut folder_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?
    {
        match field.name().unwrap_or("") {
            "file" => {
                let name = field.file_name().unwrap_or("upload.bin").to_string();
                let mime = field.content_type().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
                files.push(IncomingFile {
                    name,
                    mime,
                    bytes: bytes.to_vec(),
                });
            }
            "folder_id" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read folder_id: {e}")))?;
                folder_id = Some(value.trim().to_string()).filter(|v| !v.is_empty());
            }
            _ => {}
        }
    }

    let outcome = state
        .upload_pipeline()
        .process_upload(&user.user_id, folder_id.as_deref(), files)
        .await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Axum handler for `GET /api/v1/uploads/{upload_id}`.
///
/// Finished uploads are reported once and then forgotten.
pub async fn upload_progress_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(upload_id): Path<String>,
) -> Result<Json<UploadProgress>, AppError> {
    // Upload ids are document ids; ownership follows the document.
    get_document(&state, &user.user_id, &upload_id).await?;

    state
        .uploads
        .poll(&upload_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Upload '{}' not found", upload_id)))
}
