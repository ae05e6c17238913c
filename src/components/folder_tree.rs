use leptos::prelude::*;

use crate::components::library::{add_folder, remove_folder};
use crate::db::models::{DocumentFilter, FolderNode};
use crate::folders::{build_folder_tree, folder_path, validate_folder_name};
use crate::store::{DocumentPatch, DocumentStore};

/// Mirror a folder deletion in the store: its documents become unfiled and
/// its children move up to its parent.
pub fn apply_folder_delete(store: &mut DocumentStore, id: &str) {
    let Some(removed) = store.remove_folder(id) else {
        return;
    };

    let filed: Vec<String> = store
        .documents_in(&DocumentFilter::InFolder(id.to_string()))
        .into_iter()
        .map(|d| d.id)
        .collect();
    for doc_id in filed {
        store.update_document(
            &doc_id,
            DocumentPatch {
                folder_id: Some(None),
                ..Default::default()
            },
        );
    }

    let children: Vec<String> = store
        .folders()
        .iter()
        .filter(|f| f.parent_id.as_deref() == Some(id))
        .map(|f| f.id.clone())
        .collect();
    for child in children {
        store.update_folder(&child, |f| f.parent_id = removed.parent_id.clone());
    }
}

#[component]
pub fn FolderSidebar(filter: RwSignal<DocumentFilter>) -> impl IntoView {
    let store = expect_context::<RwSignal<DocumentStore>>();
    let tree = Memo::new(move |_| store.with(|s| build_folder_tree(s.folders())));
    let unfiled_count = Memo::new(move |_| store.with(|s| s.documents_in(&DocumentFilter::Unfiled).len()));
    let total_count = Memo::new(move |_| store.with(|s| s.documents().len()));

    let new_name = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);

    let create = Action::new(move |(name, parent): &(String, Option<String>)| {
        let name = name.clone();
        let parent = parent.clone();
        async move {
            match add_folder(name, parent).await {
                Ok(folder) => {
                    store.update(|s| s.add_folder(folder));
                    new_name.set(String::new());
                    error.set(None);
                }
                Err(e) => error.set(Some(e.to_string())),
            }
        }
    });

    let delete = Action::new(move |id: &String| {
        let id = id.clone();
        async move {
            let snapshot = store.get_untracked();
            store.update(|s| apply_folder_delete(s, &id));
            filter.set(DocumentFilter::All);
            if let Err(e) = remove_folder(id).await {
                store.set(snapshot);
                error.set(Some(e.to_string()));
            }
        }
    });

    let on_create = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        match validate_folder_name(&new_name.get_untracked()) {
            Ok(name) => {
                let parent = match filter.get_untracked() {
                    DocumentFilter::InFolder(id) => Some(id),
                    _ => None,
                };
                create.dispatch((name, parent));
            }
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    let entry_class = move |target: DocumentFilter| {
        move || {
            if filter.get() == target {
                "active"
            } else {
                ""
            }
        }
    };

    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body p-4 space-y-2">
                <h2 class="font-semibold">"Folders"</h2>
                <ul class="menu menu-sm p-0">
                    <li>
                        <a class=entry_class(DocumentFilter::All) on:click=move |_| filter.set(DocumentFilter::All)>
                            "All documents"
                            <span class="badge badge-ghost badge-sm">{move || total_count.get()}</span>
                        </a>
                    </li>
                    <li>
                        <a class=entry_class(DocumentFilter::Unfiled) on:click=move |_| filter.set(DocumentFilter::Unfiled)>
                            "Unfiled"
                            <span class="badge badge-ghost badge-sm">{move || unfiled_count.get()}</span>
                        </a>
                    </li>
                    {move || tree.get().into_iter().map(|node| folder_item(node, filter)).collect_view()}
                </ul>

                <form class="join w-full" on:submit=on_create>
                    <input
                        type="text"
                        class="input input-bordered input-sm join-item w-full"
                        placeholder="New folder"
                        prop:value=new_name
                        on:input=move |ev| new_name.set(event_target_value(&ev))
                    />
                    <button type="submit" class="btn btn-sm btn-primary join-item" prop:disabled=move || create.pending().get()>
                        "Add"
                    </button>
                </form>

                {move || match filter.get() {
                    DocumentFilter::InFolder(id) => Some(view! {
                        <button class="btn btn-xs btn-ghost text-error" on:click=move |_| { delete.dispatch(id.clone()); }>
                            "Delete this folder"
                        </button>
                    }),
                    _ => None,
                }}

                {move || error.get().map(|msg| view! { <p class="text-error text-sm">{msg}</p> })}
            </div>
        </div>
    }
}

fn folder_item(node: FolderNode, filter: RwSignal<DocumentFilter>) -> AnyView {
    let target = DocumentFilter::InFolder(node.id.clone());
    let is_active = {
        let target = target.clone();
        move || filter.get() == target
    };
    let children = node.children;

    view! {
        <li>
            <a class=move || if is_active() { "active" } else { "" } on:click=move |_| filter.set(target.clone())>
                {node.name}
                <span class="badge badge-ghost badge-sm">{node.document_count}</span>
            </a>
            {(!children.is_empty()).then(|| view! {
                <ul>
                    {children.into_iter().map(|child| folder_item(child, filter)).collect_view()}
                </ul>
            })}
        </li>
    }
    .into_any()
}

/// Path from the library root to the selected folder.
#[component]
pub fn Breadcrumb(filter: RwSignal<DocumentFilter>) -> impl IntoView {
    let store = expect_context::<RwSignal<DocumentStore>>();

    view! {
        <div class="breadcrumbs text-sm">
            <ul>
                <li><a on:click=move |_| filter.set(DocumentFilter::All)>"Documents"</a></li>
                {move || match filter.get() {
                    DocumentFilter::All => ().into_any(),
                    DocumentFilter::Unfiled => view! { <li>"Unfiled"</li> }.into_any(),
                    DocumentFilter::InFolder(id) => store
                        .with(|s| folder_path(s.folders(), &id))
                        .into_iter()
                        .map(|folder| {
                            let target = DocumentFilter::InFolder(folder.id);
                            view! { <li><a on:click=move |_| filter.set(target.clone())>{folder.name}</a></li> }
                        })
                        .collect_view()
                        .into_any(),
                }}
            </ul>
        </div>
    }
}
