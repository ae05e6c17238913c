use leptos::prelude::*;

use crate::upload::pipeline::UploadOutcome;
use crate::upload::progress::{UploadProgress, UploadStatus};
use crate::upload::validation::{FileValidationConfig, format_file_size};

/// Reactive state of the drop zone, shared with the upload task.
#[derive(Clone, Copy)]
struct ZoneState {
    rows: RwSignal<Vec<UploadProgress>>,
    error: RwSignal<Option<String>>,
    warnings: RwSignal<Vec<String>>,
    busy: RwSignal<bool>,
    dragging: RwSignal<bool>,
}

impl ZoneState {
    fn new() -> Self {
        Self {
            rows: RwSignal::new(Vec::new()),
            error: RwSignal::new(None),
            warnings: RwSignal::new(Vec::new()),
            busy: RwSignal::new(false),
            dragging: RwSignal::new(false),
        }
    }
}

/// Drag-and-drop or click-to-pick upload area.
///
/// Files are checked against `limits` before anything is sent; the server
/// checks them again.
#[component]
pub fn UploadZone(
    #[prop(into)] folder_id: Signal<Option<String>>,
    limits: FileValidationConfig,
    on_uploaded: Callback<UploadOutcome>,
) -> impl IntoView {
    let zone = ZoneState::new();
    let hint = format!(
        "{} · up to {} files, {} each",
        limits.allowed_extensions.join(" "),
        limits.max_files,
        format_file_size(limits.max_size)
    );
    let limits = StoredValue::new(limits);

    let on_change = move |ev: leptos::ev::Event| {
        #[cfg(feature = "hydrate")]
        {
            let input = event_target::<web_sys::HtmlInputElement>(&ev);
            if let Some(list) = input.files() {
                client::start_upload(
                    client::collect_files(list),
                    folder_id.get_untracked(),
                    limits.get_value(),
                    zone,
                    on_uploaded,
                );
            }
            input.set_value("");
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (ev, folder_id, limits, on_uploaded);
    };

    let on_drop = move |ev: leptos::ev::DragEvent| {
        ev.prevent_default();
        zone.dragging.set(false);
        #[cfg(feature = "hydrate")]
        if let Some(list) = ev.data_transfer().and_then(|dt| dt.files()) {
            client::start_upload(
                client::collect_files(list),
                folder_id.get_untracked(),
                limits.get_value(),
                zone,
                on_uploaded,
            );
        }
    };

    view! {
        <div class="space-y-3">
            <label
                class=move || {
                    let base = "flex flex-col items-center justify-center gap-2 border-2 border-dashed rounded-box p-8 cursor-pointer transition-colors";
                    if zone.dragging.get() {
                        format!("{base} border-primary bg-primary/10")
                    } else {
                        format!("{base} border-base-300 bg-base-100")
                    }
                }
                on:dragover=move |ev: leptos::ev::DragEvent| {
                    ev.prevent_default();
                    zone.dragging.set(true);
                }
                on:dragleave=move |_| zone.dragging.set(false)
                on:drop=on_drop
            >
                <span class="font-semibold">
                    {move || if zone.busy.get() { "Uploading..." } else { "Drop files here or click to browse" }}
                </span>
                <span class="text-xs text-base-content/60">{hint}</span>
                <input type="file" multiple class="hidden" prop:disabled=move || zone.busy.get() on:change=on_change/>
            </label>

            {move || zone.error.get().map(|msg| view! {
                <div class="alert alert-error text-sm"><span>{msg}</span></div>
            })}
            {move || {
                let warnings = zone.warnings.get();
                (!warnings.is_empty()).then(|| view! {
                    <div class="alert alert-warning text-sm">
                        <ul>{warnings.into_iter().map(|w| view! { <li>{w}</li> }).collect_view()}</ul>
                    </div>
                })
            }}

            <ul class="space-y-2">
                {move || zone.rows.get().into_iter().map(|row| view! { <ProgressRow row=row/> }).collect_view()}
            </ul>
        </div>
    }
}

#[component]
fn ProgressRow(row: UploadProgress) -> impl IntoView {
    let (class, label) = match row.status {
        UploadStatus::Uploading => ("progress progress-primary", format!("{}%", row.progress)),
        UploadStatus::Processing => ("progress progress-warning", "Processing".to_string()),
        UploadStatus::Complete => ("progress progress-success", "Done".to_string()),
        UploadStatus::Error => ("progress progress-error", "Failed".to_string()),
    };

    view! {
        <li class="flex flex-col gap-1">
            <div class="flex justify-between text-sm">
                <span class="truncate">{row.file_name}</span>
                <span>{label}</span>
            </div>
            <progress class=class value=row.progress.to_string() max="100"></progress>
            {row.error.map(|e| view! { <span class="text-error text-xs">{e}</span> })}
        </li>
    }
}

#[cfg(feature = "hydrate")]
mod client {
    use futures::future::{select, Either};
    use leptos::prelude::*;

    use super::ZoneState;
    use crate::upload::pipeline::UploadOutcome;
    use crate::upload::progress::{
        simulate, UploadProgress, UploadStatus, SIMULATION_INTERVAL, SIMULATION_STEP,
    };
    use crate::upload::validation::{validate_files, FileDescriptor, FileValidationConfig};

    pub fn collect_files(list: web_sys::FileList) -> Vec<web_sys::File> {
        (0..list.length()).filter_map(|i| list.get(i)).collect()
    }

    pub fn start_upload(
        files: Vec<web_sys::File>,
        folder_id: Option<String>,
        limits: FileValidationConfig,
        zone: ZoneState,
        on_uploaded: Callback<UploadOutcome>,
    ) {
        if files.is_empty() {
            return;
        }

        let descriptors: Vec<FileDescriptor> = files
            .iter()
            .map(|f| FileDescriptor::new(f.name(), f.size() as u64, f.type_()))
            .collect();

        match validate_files(&descriptors, &limits) {
            Ok(warnings) => {
                zone.error.set(None);
                zone.warnings.set(warnings);
            }
            Err(e) => {
                zone.error.set(Some(e.to_string()));
                return;
            }
        }

        let form = match build_form(&files, folder_id.as_deref()) {
            Ok(form) => form,
            Err(msg) => {
                zone.error.set(Some(msg));
                return;
            }
        };

        zone.rows.set(
            files
                .iter()
                .enumerate()
                .map(|(i, f)| UploadProgress {
                    upload_id: format!("pending-{i}"),
                    file_name: f.name(),
                    progress: 0,
                    status: UploadStatus::Uploading,
                    error: None,
                })
                .collect(),
        );
        zone.busy.set(true);

        leptos::task::spawn_local(async move {
            let ticker = Box::pin(async move {
                let progress = simulate(SIMULATION_STEP, SIMULATION_INTERVAL);
                let interval = progress.interval();
                for value in progress {
                    gloo_timers::future::sleep(interval).await;
                    zone.rows.update(|rows| rows.iter_mut().for_each(|r| r.progress = value));
                }
                // Hold at the ceiling until the request settles.
                std::future::pending::<()>().await;
            });
            let request = Box::pin(send(form));

            let result = match select(request, ticker).await {
                Either::Left((result, _)) => result,
                Either::Right(((), request)) => request.await,
            };

            match result {
                Ok(outcome) => {
                    zone.rows.set(outcome.uploads.clone());
                    zone.warnings.update(|w| {
                        for warning in &outcome.warnings {
                            if !w.contains(warning) {
                                w.push(warning.clone());
                            }
                        }
                    });
                    on_uploaded.run(outcome);
                }
                Err(msg) => {
                    zone.rows.update(|rows| {
                        for row in rows.iter_mut() {
                            row.status = UploadStatus::Error;
                            row.error = Some(msg.clone());
                        }
                    });
                    zone.error.set(Some(msg));
                }
            }
            zone.busy.set(false);
        });
    }

    fn build_form(files: &[web_sys::File], folder_id: Option<&str>) -> Result<web_sys::FormData, String> {
        let form = web_sys::FormData::new().map_err(|_| "Could not prepare upload".to_string())?;
        for file in files {
            form.append_with_blob_and_filename("file", file, &file.name())
                .map_err(|_| format!("Could not read \"{}\"", file.name()))?;
        }
        if let Some(folder_id) = folder_id {
            form.append_with_str("folder_id", folder_id)
                .map_err(|_| "Could not prepare upload".to_string())?;
        }
        Ok(form)
    }

    async fn send(form: web_sys::FormData) -> Result<UploadOutcome, String> {
        let response = gloo_net::http::Request::post("/api/v1/uploads")
            .body(form)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if response.ok() {
            return response.json::<UploadOutcome>().await.map_err(|e| e.to_string());
        }

        let body: serde_json::Value = response.json().await.unwrap_or_default();
        Err(body["error"]
            .as_str()
            .unwrap_or("Upload failed")
            .to_string())
    }
}
