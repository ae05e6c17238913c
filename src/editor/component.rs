use leptos::prelude::*;
use leptos_tiptap::*;
use serde::{Deserialize, Serialize};

use crate::app::Loading;
use crate::collaboration::PresenceView;
use crate::components::lens_selector::LensSelector;
use crate::db::models::Document;
use crate::lens::{definition, LensKind};

/// A document as shown in the reading view through one lens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingView {
    pub document: Document,
    pub kind: LensKind,
    /// Sanitised HTML of the lens content.
    pub lens_html: String,
    /// Headings of the extracted document content.
    pub outline: Vec<String>,
    /// The lens text was edited by the user rather than generated.
    pub stored: bool,
}

/// Server function to load a document through a lens. `None` when the
/// document does not exist for the signed-in user.
#[server(GetReadingView, "/api")]
pub async fn get_reading_view(
    id: String,
    kind: LensKind,
) -> Result<Option<ReadingView>, ServerFnError> {
    use crate::api::errors::to_server_fn_error;
    use crate::error::AppError;
    use crate::rendering::markdown::{headings, render_markdown};

    let user = crate::auth::middleware::session_user().await?;
    let state = expect_context::<crate::state::AppState>();

    let document = match crate::api::documents::get_document(&state, &user.user_id, &id).await {
        Ok(doc) => doc,
        Err(AppError::NotFound(_)) => return Ok(None),
        Err(e) => return Err(to_server_fn_error(e)),
    };
    let lens = crate::api::lenses::get_lens(&state, &user.user_id, &id, kind)
        .await
        .map_err(to_server_fn_error)?;

    Ok(Some(ReadingView {
        outline: headings(&document.content),
        lens_html: render_markdown(&lens.content),
        stored: lens.stored,
        kind,
        document,
    }))
}

/// Server function to save the editor's HTML as the lens text.
#[server(SaveLensContent, "/api")]
pub async fn save_lens_content(
    id: String,
    kind: LensKind,
    html_content: String,
) -> Result<String, ServerFnError> {
    let user = crate::auth::middleware::session_user().await?;
    let state = expect_context::<crate::state::AppState>();

    crate::api::lenses::save_lens(&state, &user.user_id, &id, kind, html_content)
        .await
        .map_err(crate::api::errors::to_server_fn_error)?;

    Ok(format!("{} saved", definition(kind).name))
}

/// Server function announcing the reader on a document.
#[server(JoinDocument, "/api")]
pub async fn join_document(id: String) -> Result<PresenceView, ServerFnError> {
    let user = crate::auth::middleware::session_user().await?;
    let state = expect_context::<crate::state::AppState>();

    crate::api::documents::get_document(&state, &user.user_id, &id)
        .await
        .map_err(crate::api::errors::to_server_fn_error)?;
    state.presence.join(&id, &user.user_id, user.short_name());
    Ok(state.presence.view(&id))
}

/// `/document/:id`: lens tabs, outline and the rich-text editor.
#[component]
pub fn ReadingPage() -> impl IntoView {
    let params = leptos_router::hooks::use_params_map();
    let id = move || params.read().get("id").unwrap_or_default();
    let kind = RwSignal::new(LensKind::default());

    let view_resource = Resource::new(move || (id(), kind.get()), |(id, kind)| get_reading_view(id, kind));
    let presence = Resource::new(id, join_document);

    view! {
        <div class="max-w-6xl mx-auto p-6 space-y-6">
            <a href="/documents" class="btn btn-ghost btn-sm">"← Documents"</a>
            <Suspense fallback=move || view! { <Loading/> }>
                {move || {
                    view_resource.get().map(|result| match result {
                        Ok(Some(reading)) => {
                            view! { <Reader reading=reading kind=kind presence=presence/> }.into_any()
                        }
                        Ok(None) => {
                            view! {
                                <div class="alert alert-warning">
                                    <span>"Document not found. It may have been deleted or moved out of your library."</span>
                                    <a href="/documents" class="btn btn-sm">"Back to documents"</a>
                                </div>
                            }.into_any()
                        }
                        Err(e) => {
                            view! {
                                <div class="alert alert-error">
                                    <span>{format!("Error loading document: {e}")}</span>
                                </div>
                            }.into_any()
                        }
                    })
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn Reader(
    reading: ReadingView,
    kind: RwSignal<LensKind>,
    presence: Resource<Result<PresenceView, ServerFnError>>,
) -> impl IntoView {
    let document_id = reading.document.id.clone();
    let lens_kind = reading.kind;

    let (msg, set_msg) = signal(TiptapInstanceMsg::Noop);
    let (value, set_value) = signal(reading.lens_html);
    let (disabled, _set_disabled) = signal(false);
    let (_selection, set_selection) = signal(TiptapSelectionState::default());
    let (save_status, set_save_status) = signal(String::new());
    let (saving, set_saving) = signal(false);

    let save_action = Action::new(move |_: &()| {
        let id = document_id.clone();
        let content = value.get_untracked();
        async move {
            set_saving.set(true);
            set_save_status.set(String::new());
            match save_lens_content(id, lens_kind, content).await {
                Ok(msg) => set_save_status.set(msg),
                Err(e) => set_save_status.set(format!("Error: {e}")),
            }
            set_saving.set(false);
        }
    });

    let doc = reading.document;
    let outline = reading.outline;

    view! {
        <div class="space-y-4">
            <div class="flex flex-wrap items-start justify-between gap-4">
                <div>
                    <h1 class="text-3xl font-bold">{doc.title}</h1>
                    <p class="text-sm text-base-content/60">{doc.original_file_name}</p>
                    <div class="flex flex-wrap gap-1 mt-2">
                        {doc.tags.into_iter().map(|tag| view! { <span class="badge badge-outline badge-sm">{tag}</span> }).collect_view()}
                    </div>
                </div>
                <Transition>
                    {move || presence.get().and_then(|p| p.ok()).filter(|p| p.is_collaborating).map(|p| view! {
                        <div class="badge badge-accent gap-1">
                            {format!("{} readers here", p.cursors.len())}
                        </div>
                    })}
                </Transition>
            </div>

            <LensSelector selected=kind/>

            <div class="flex flex-col lg:flex-row gap-6">
                {(!outline.is_empty()).then(|| view! {
                    <nav class="lg:w-56 shrink-0">
                        <h2 class="font-semibold mb-2">"Outline"</h2>
                        <ul class="menu menu-sm p-0">
                            {outline.into_iter().map(|h| view! { <li><span>{h}</span></li> }).collect_view()}
                        </ul>
                    </nav>
                })}

                <div class="flex-1 space-y-4">
                    // Toolbar
                    <div class="flex flex-wrap gap-1 p-2 bg-base-200 rounded-lg">
                        <button class="btn btn-sm btn-ghost" title="Bold"
                            on:click=move |_| set_msg.set(TiptapInstanceMsg::Bold)>
                            <strong>"B"</strong>
                        </button>
                        <button class="btn btn-sm btn-ghost" title="Italic"
                            on:click=move |_| set_msg.set(TiptapInstanceMsg::Italic)>
                            <em>"I"</em>
                        </button>
                        <div class="divider divider-horizontal mx-0"></div>
                        <button class="btn btn-sm btn-ghost" title="Heading 2"
                            on:click=move |_| set_msg.set(TiptapInstanceMsg::H2)>
                            "H2"
                        </button>
                        <button class="btn btn-sm btn-ghost" title="Heading 3"
                            on:click=move |_| set_msg.set(TiptapInstanceMsg::H3)>
                            "H3"
                        </button>
                        <div class="divider divider-horizontal mx-0"></div>
                        <button class="btn btn-sm btn-ghost" title="Bullet List"
                            on:click=move |_| set_msg.set(TiptapInstanceMsg::BulletList)>
                            "List"
                        </button>
                        <button class="btn btn-sm btn-ghost" title="Ordered List"
                            on:click=move |_| set_msg.set(TiptapInstanceMsg::OrderedList)>
                            "1. List"
                        </button>
                        <button class="btn btn-sm btn-ghost" title="Blockquote"
                            on:click=move |_| set_msg.set(TiptapInstanceMsg::Blockquote)>
                            "Quote"
                        </button>
                        <button class="btn btn-sm btn-ghost" title="Highlight"
                            on:click=move |_| set_msg.set(TiptapInstanceMsg::Highlight)>
                            "HL"
                        </button>
                    </div>

                    // Editor
                    <div class="border border-base-300 rounded-lg min-h-[400px] p-4 bg-base-100 prose prose-lg max-w-none">
                        <TiptapInstance
                            id=Signal::derive(|| "grasp-editor".to_string())
                            msg=msg
                            disabled=disabled
                            value=value
                            set_value=Callback::new(move |(v,): (TiptapContent,)| {
                                set_value.set(match v {
                                    TiptapContent::Html(content) => content,
                                    TiptapContent::Json(content) => content,
                                });
                            })
                            on_selection_change=Callback::new(move |(state,): (TiptapSelectionState,)| {
                                set_selection.set(state);
                            })
                        />
                    </div>

                    <div class="flex items-center gap-4">
                        <button
                            class="btn btn-primary"
                            prop:disabled=saving
                            on:click=move |_| { save_action.dispatch(()); }
                        >
                            {move || if saving.get() { "Saving..." } else { "Save lens" }}
                        </button>
                        {(!reading.stored).then(|| view! {
                            <span class="text-xs text-base-content/60">"Generated from the document title"</span>
                        })}
                        {move || {
                            let status = save_status.get();
                            if status.is_empty() {
                                view! { <span></span> }.into_any()
                            } else if status.starts_with("Error") {
                                view! { <span class="text-error">{status}</span> }.into_any()
                            } else {
                                view! { <span class="text-success">{status}</span> }.into_any()
                            }
                        }}
                    </div>
                </div>
            </div>
        </div>
    }
}
