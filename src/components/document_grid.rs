use leptos::prelude::*;

use crate::components::library::{apply_move, file_document, remove_document};
use crate::db::models::{Document, DocumentStatus};
use crate::store::DocumentStore;
use crate::upload::validation::{file_type_label, format_file_size};

fn status_badge(status: DocumentStatus) -> (&'static str, &'static str) {
    match status {
        DocumentStatus::Uploading => ("badge-info", "Uploading"),
        DocumentStatus::Processing => ("badge-warning", "Processing"),
        DocumentStatus::Ready => ("badge-success", "Ready"),
        DocumentStatus::Error => ("badge-error", "Error"),
    }
}

#[component]
pub fn DocumentGrid(#[prop(into)] documents: Signal<Vec<Document>>) -> impl IntoView {
    view! {
        {move || {
            let docs = documents.get();
            if docs.is_empty() {
                view! {
                    <div class="alert">
                        <span>"No documents here yet. Drop a file above to get started."</span>
                    </div>
                }.into_any()
            } else {
                view! {
                    <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-4">
                        {docs.into_iter().map(|doc| view! { <DocumentCard doc=doc/> }).collect_view()}
                    </div>
                }.into_any()
            }
        }}
    }
}

#[component]
fn DocumentCard(doc: Document) -> impl IntoView {
    let store = expect_context::<RwSignal<DocumentStore>>();
    let error = RwSignal::new(None::<String>);

    // Optimistic: the card disappears at once and comes back if the server refuses.
    let delete = Action::new(move |doc: &Document| {
        let doc = doc.clone();
        async move {
            let snapshot = store.get_untracked();
            store.update(|s| {
                if let Some(folder_id) = &doc.folder_id {
                    s.update_folder(folder_id, |f| f.document_count = (f.document_count - 1).max(0));
                }
                s.remove_document(&doc.id);
            });
            if let Err(e) = remove_document(doc.id.clone()).await {
                store.set(snapshot);
                error.set(Some(e.to_string()));
            }
        }
    });

    let move_to = Action::new(move |(id, folder_id): &(String, Option<String>)| {
        let id = id.clone();
        let folder_id = folder_id.clone();
        async move {
            let snapshot = store.get_untracked();
            store.update(|s| apply_move(s, &id, folder_id.clone()));
            if let Err(e) = file_document(id, folder_id).await {
                store.set(snapshot);
                error.set(Some(e.to_string()));
            }
        }
    });

    let folders = Memo::new(move |_| {
        store.with(|s| {
            let mut folders: Vec<(String, String)> =
                s.folders().iter().map(|f| (f.id.clone(), f.name.clone())).collect();
            folders.sort_by(|a, b| a.1.cmp(&b.1));
            folders
        })
    });

    let (badge_class, badge_label) = status_badge(doc.status);
    let href = format!("/document/{}", doc.id);
    let meta = format!(
        "{} · {} · {}",
        file_type_label(&doc.original_file_name),
        format_file_size(doc.file_size),
        doc.updated_at.format("%b %-d, %Y")
    );
    let current_folder = doc.folder_id.clone().unwrap_or_default();
    let unfiled = current_folder.is_empty();
    let id = doc.id.clone();
    let stored = StoredValue::new(doc.clone());

    view! {
        <div class="card bg-base-100 shadow-md hover:shadow-xl transition-shadow">
            <div class="card-body p-5">
                <div class="flex items-start justify-between gap-2">
                    <a href=href class="card-title text-lg link link-hover">{doc.title}</a>
                    <span class=format!("badge badge-sm {badge_class}")>{badge_label}</span>
                </div>
                <p class="text-xs text-base-content/60">{meta}</p>
                {doc.preview.map(|preview| view! { <p class="text-sm line-clamp-3">{preview}</p> })}
                <div class="flex flex-wrap gap-1">
                    {doc.tags.into_iter().map(|tag| view! { <span class="badge badge-outline badge-sm">{tag}</span> }).collect_view()}
                </div>
                <div class="card-actions justify-between items-center mt-2">
                    <select
                        class="select select-bordered select-xs"
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            let target = (!value.is_empty()).then_some(value);
                            move_to.dispatch((id.clone(), target));
                        }
                    >
                        <option value="" selected=unfiled>"Unfiled"</option>
                        {move || folders.get().into_iter().map(|(fid, name)| {
                            let selected = fid == current_folder;
                            view! { <option value=fid selected=selected>{name}</option> }
                        }).collect_view()}
                    </select>
                    <button
                        class="btn btn-xs btn-ghost text-error"
                        prop:disabled=move || delete.pending().get()
                        on:click=move |_| { delete.dispatch(stored.get_value()); }
                    >
                        "Delete"
                    </button>
                </div>
                {move || error.get().map(|msg| view! { <p class="text-error text-xs">{msg}</p> })}
            </div>
        </div>
    }
}
