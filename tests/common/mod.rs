#![allow(dead_code)]

use axum::Router;
use axum_test::multipart::{MultipartForm, Part};

use grasp::state::AppState;
use grasp::upload::validation::FileValidationConfig;

/// An application wired to in-memory repositories and storage, serving the
/// JSON API only (no Leptos SSR).
pub struct TestEnv {
    pub state: AppState,
    pub router: Router,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_state(AppState::in_memory())
    }

    /// Same as [`TestEnv::new`] with custom upload limits.
    pub fn with_limits(validation: FileValidationConfig) -> Self {
        let leptos_options = leptos::prelude::LeptosOptions::builder()
            .output_name("grasp")
            .build();
        Self::with_state(AppState::in_memory_with(leptos_options, validation))
    }

    pub fn with_state(state: AppState) -> Self {
        let router = grasp::api::router(&state).with_state(state.clone());
        Self { state, router }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .save_cookies()
            .expect_success_by_default()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .save_cookies()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }
}

/// Helper: sign in as a demo account; the session cookie is kept by the server.
pub async fn login(server: &axum_test::TestServer, username: &str) {
    server
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "username": username,
            "password": username
        }))
        .expect_success()
        .await;
}

/// Helper: upload one file, optionally into a folder.
pub async fn upload(
    server: &axum_test::TestServer,
    file_name: &str,
    mime: &str,
    bytes: &[u8],
    folder_id: Option<&str>,
) -> axum_test::TestResponse {
    let mut form = MultipartForm::new().add_part(
        "file",
        Part::bytes(bytes.to_vec())
            .file_name(file_name)
            .mime_type(mime),
    );
    if let Some(folder_id) = folder_id {
        form = form.add_text("folder_id", folder_id.to_string());
    }

    server.post("/api/v1/uploads").multipart(form).await
}

/// Helper: upload a markdown file and return the created document.
pub async fn upload_markdown(
    server: &axum_test::TestServer,
    file_name: &str,
    content: &str,
    folder_id: Option<&str>,
) -> serde_json::Value {
    let response = upload(server, file_name, "text/markdown", content.as_bytes(), folder_id).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    body["documents"][0].clone()
}

/// Helper: create a folder and return it.
pub async fn create_folder(
    server: &axum_test::TestServer,
    name: &str,
    parent_id: Option<&str>,
) -> serde_json::Value {
    let response = server
        .post("/api/v1/folders")
        .json(&serde_json::json!({
            "name": name,
            "parent_id": parent_id
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}
