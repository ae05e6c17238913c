use leptos::prelude::*;

use crate::lens::{all_lenses, LensKind, LensStatus};

/// Tabs for every lens; locked lenses are shown but cannot be picked.
#[component]
pub fn LensSelector(selected: RwSignal<LensKind>) -> impl IntoView {
    view! {
        <div role="tablist" class="tabs tabs-boxed flex-wrap">
            {all_lenses().into_iter().map(|lens| {
                let kind = lens.kind;
                let locked = lens.status == LensStatus::Locked;
                let title = if locked {
                    format!("{}: coming in phase {}", lens.description, lens.phase)
                } else {
                    lens.description.clone()
                };
                view! {
                    <button
                        role="tab"
                        title=title
                        class=move || {
                            if selected.get() == kind { "tab tab-active" } else { "tab" }
                        }
                        prop:disabled=locked
                        on:click=move |_| {
                            if !locked {
                                selected.set(kind);
                            }
                        }
                    >
                        {lens.name}
                        {locked.then(|| view! { <span class="badge badge-ghost badge-xs ml-1">"Soon"</span> })}
                    </button>
                }
            }).collect_view()}
        </div>
    }
}
