//! JSON API served alongside the Leptos pages.

pub mod documents;
pub mod errors;
pub mod folders;
pub mod lenses;
pub mod presence;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::auth::demo_auth;
use crate::state::AppState;

/// Headroom for multipart framing on top of the file payloads.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// `GET /health`
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Every API route. Uploads may carry `max_files` files of `max_size` bytes
/// each, so their body limit is raised accordingly.
pub fn router(state: &AppState) -> Router<AppState> {
    let upload_limit = (state.validation.max_size as usize)
        .saturating_mul(state.validation.max_files)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/auth/login", post(demo_auth::login_handler))
        .route("/api/auth/me", get(demo_auth::me_handler))
        .route("/api/auth/logout", post(demo_auth::logout_handler))
        .route("/api/v1/documents", get(documents::list_documents_handler))
        .route(
            "/api/v1/documents/{id}",
            get(documents::get_document_handler)
                .patch(documents::update_document_handler)
                .delete(documents::delete_document_handler),
        )
        .route(
            "/api/v1/documents/{id}/folder",
            put(documents::move_document_handler),
        )
        .route(
            "/api/v1/documents/{id}/lenses/{kind}",
            get(lenses::get_lens_handler).put(lenses::save_lens_handler),
        )
        .route(
            "/api/v1/documents/{id}/presence",
            get(presence::get_presence_handler)
                .put(presence::update_presence_handler)
                .delete(presence::leave_presence_handler),
        )
        .route(
            "/api/v1/uploads",
            post(upload::upload_handler).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/v1/uploads/{upload_id}",
            get(upload::upload_progress_handler),
        )
        .route("/api/v1/lenses", get(lenses::list_lenses_handler))
        .route(
            "/api/v1/folders",
            get(folders::list_folders_handler).post(folders::create_folder_handler),
        )
        .route("/api/v1/folders/tree", get(folders::folder_tree_handler))
        .route(
            "/api/v1/folders/{id}",
            axum::routing::patch(folders::rename_folder_handler)
                .delete(folders::delete_folder_handler),
        )
}
