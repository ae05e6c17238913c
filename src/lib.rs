pub mod app;
pub mod auth;
pub mod collaboration;
pub mod components {
    pub mod document_grid;
    pub mod folder_tree;
    pub mod lens_selector;
    pub mod library;
    pub mod login;
    pub mod upload_zone;
}
pub mod db {
    pub mod folder_repository;
    pub mod memory;
    pub mod models;
    pub mod repository;
}
pub mod editor {
    pub mod component;
}
pub mod error;
pub mod folders;
pub mod lens;
pub mod rendering {
    pub mod markdown;
}
pub mod storage {
    pub mod client;
}
pub mod store;
pub mod upload;

#[cfg(feature = "ssr")]
pub mod api;
#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod demo_seeder;
#[cfg(feature = "ssr")]
pub mod state;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(app::App);
}
