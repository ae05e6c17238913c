use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::app::Loading;
use crate::components::document_grid::DocumentGrid;
use crate::components::folder_tree::{Breadcrumb, FolderSidebar};
use crate::components::upload_zone::UploadZone;
use crate::db::models::{Document, DocumentFilter, DocumentStatus, Folder};
use crate::store::{matches_query, DocumentPatch, DocumentStore};
use crate::upload::pipeline::UploadOutcome;
use crate::upload::validation::FileValidationConfig;

/// Everything the documents page needs on first render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Library {
    pub documents: Vec<Document>,
    pub folders: Vec<Folder>,
    pub limits: FileValidationConfig,
}

#[server(ListLibrary, "/api")]
pub async fn list_library() -> Result<Library, ServerFnError> {
    use crate::api::errors::to_server_fn_error;

    let user = crate::auth::middleware::session_user().await?;
    let state = expect_context::<crate::state::AppState>();

    let documents =
        crate::api::documents::list_documents(&state, &user.user_id, &DocumentFilter::All, None)
            .await
            .map_err(to_server_fn_error)?;
    let folders = crate::api::folders::list_folders(&state, &user.user_id)
        .await
        .map_err(to_server_fn_error)?;

    Ok(Library {
        documents,
        folders,
        limits: state.validation.clone(),
    })
}

#[server(AddFolder, "/api")]
pub async fn add_folder(name: String, parent_id: Option<String>) -> Result<Folder, ServerFnError> {
    use crate::db::models::CreateFolderRequest;

    let user = crate::auth::middleware::session_user().await?;
    let state = expect_context::<crate::state::AppState>();
    crate::api::folders::create_folder(&state, &user.user_id, CreateFolderRequest { name, parent_id })
        .await
        .map_err(crate::api::errors::to_server_fn_error)
}

#[server(RemoveFolder, "/api")]
pub async fn remove_folder(id: String) -> Result<(), ServerFnError> {
    let user = crate::auth::middleware::session_user().await?;
    let state = expect_context::<crate::state::AppState>();
    crate::api::folders::delete_folder(&state, &user.user_id, &id)
        .await
        .map_err(crate::api::errors::to_server_fn_error)
}

#[server(RemoveDocument, "/api")]
pub async fn remove_document(id: String) -> Result<(), ServerFnError> {
    let user = crate::auth::middleware::session_user().await?;
    let state = expect_context::<crate::state::AppState>();
    crate::api::documents::delete_document(&state, &user.user_id, &id)
        .await
        .map_err(crate::api::errors::to_server_fn_error)
}

#[server(FileDocument, "/api")]
pub async fn file_document(id: String, folder_id: Option<String>) -> Result<Document, ServerFnError> {
    let user = crate::auth::middleware::session_user().await?;
    let state = expect_context::<crate::state::AppState>();
    crate::api::documents::move_document(&state, &user.user_id, &id, folder_id)
        .await
        .map_err(crate::api::errors::to_server_fn_error)
}

/// Record a finished upload batch in the store.
pub fn apply_upload(store: &mut DocumentStore, outcome: UploadOutcome) {
    for doc in outcome.documents {
        if let (Some(folder_id), DocumentStatus::Ready) = (&doc.folder_id, doc.status) {
            store.update_folder(folder_id, |f| f.document_count += 1);
        }
        store.add_document(doc);
    }
}

/// Move a document between folders, keeping both folder counts in step.
pub fn apply_move(store: &mut DocumentStore, id: &str, folder_id: Option<String>) {
    let Some(previous) = store.document(id).map(|d| d.folder_id.clone()) else {
        return;
    };
    if previous == folder_id {
        return;
    }
    if let Some(previous) = &previous {
        store.update_folder(previous, |f| f.document_count = (f.document_count - 1).max(0));
    }
    if let Some(target) = &folder_id {
        store.update_folder(target, |f| f.document_count += 1);
    }
    store.update_document(
        id,
        DocumentPatch {
            folder_id: Some(folder_id),
            ..Default::default()
        },
    );
}

/// `/documents`: folder sidebar, upload zone and the document grid.
#[component]
pub fn DocumentsPage() -> impl IntoView {
    let library = Resource::new(|| (), |_| list_library());

    view! {
        <Suspense fallback=|| view! { <Loading/> }>
            {move || library.get().map(|result| match result {
                Ok(library) => view! { <LibraryView library=library/> }.into_any(),
                Err(e) => view! {
                    <div class="alert alert-error m-6">
                        <span>{format!("Error loading documents: {e}")}</span>
                    </div>
                }.into_any(),
            })}
        </Suspense>
    }
}

#[component]
fn LibraryView(library: Library) -> impl IntoView {
    let mut initial = DocumentStore::new();
    initial.set_documents(library.documents);
    initial.set_folders(library.folders);
    let store = RwSignal::new(initial);
    provide_context(store);

    let filter = RwSignal::new(DocumentFilter::All);
    let query = RwSignal::new(String::new());

    let visible = Memo::new(move |_| {
        let q = query.get();
        store.with(|s| {
            s.documents_in(&filter.get())
                .into_iter()
                .filter(|d| matches_query(d, &q))
                .collect::<Vec<_>>()
        })
    });

    let target_folder = Signal::derive(move || match filter.get() {
        DocumentFilter::InFolder(id) => Some(id),
        _ => None,
    });

    let on_uploaded = Callback::new(move |outcome: UploadOutcome| {
        store.update(|s| apply_upload(s, outcome));
    });

    view! {
        <div class="flex flex-col md:flex-row gap-6 p-6">
            <aside class="md:w-64 shrink-0">
                <FolderSidebar filter=filter/>
            </aside>
            <section class="flex-1 space-y-6">
                <div class="flex flex-wrap items-center justify-between gap-4">
                    <Breadcrumb filter=filter/>
                    <input
                        type="search"
                        class="input input-bordered w-full md:w-72"
                        placeholder="Search documents..."
                        prop:value=query
                        on:input=move |ev| query.set(event_target_value(&ev))
                    />
                </div>
                <UploadZone folder_id=target_folder limits=library.limits on_uploaded=on_uploaded/>
                <DocumentGrid documents=visible/>
            </section>
        </div>
    }
}
