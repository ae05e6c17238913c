//! Presence endpoints.
//!
//! Every call requires owning the document and cursors are keyed by user id,
//! so over HTTP a document has at most one reader and `is_collaborating`
//! stays false. Several readers only appear once documents can be shared
//! with other users.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::documents::get_document;
use crate::auth::middleware::CurrentUser;
use crate::collaboration::{CursorUpdate, PresenceView};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/v1/documents/{id}/presence`
pub async fn get_presence_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<PresenceView>, AppError> {
    get_document(&state, &user.user_id, &id).await?;
    Ok(Json(state.presence.view(&id)))
}

/// `PUT /api/v1/documents/{id}/presence`: announce or move the caller's cursor.
pub async fn update_presence_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(update): Json<CursorUpdate>,
) -> Result<Json<PresenceView>, AppError> {
    get_document(&state, &user.user_id, &id).await?;
    state
        .presence
        .update_cursor(&id, &user.user_id, user.short_name(), update);
    Ok(Json(state.presence.view(&id)))
}

/// `DELETE /api/v1/documents/{id}/presence`
pub async fn leave_presence_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> StatusCode {
    state.presence.leave(&id, &user.user_id);
    StatusCode::NO_CONTENT
}
