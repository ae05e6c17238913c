use leptos::prelude::*;

use crate::app::Session;
use crate::auth::demo_auth::demo_accounts;

/// Sign-in form for the demo accounts.
#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<Session>();
    let login = session.login;

    let error = move || {
        login.value().get().and_then(|result| result.err()).map(|e| {
            // Server errors arrive as "error running server function: <message>"
            let text = e.to_string();
            text.rsplit(": ").next().unwrap_or(&text).to_string()
        })
    };

    view! {
        <div class="hero min-h-screen">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-4xl font-bold">"grasp.now"</h1>
                    <p class="py-2 text-base-content/70">"Read every document the way you learn best."</p>
                </div>
                <div class="card bg-base-100 w-full shadow-xl">
                    <ActionForm action=login attr:class="card-body">
                        <label class="form-control w-full">
                            <span class="label-text">"Username"</span>
                            <input type="text" name="username" class="input input-bordered w-full" autocomplete="username" required/>
                        </label>
                        <label class="form-control w-full">
                            <span class="label-text">"Password"</span>
                            <input type="password" name="password" class="input input-bordered w-full" autocomplete="current-password" required/>
                        </label>
                        {move || error().map(|msg| view! {
                            <div class="alert alert-error text-sm"><span>{msg}</span></div>
                        })}
                        <button type="submit" class="btn btn-primary mt-2" prop:disabled=move || login.pending().get()>
                            {move || if login.pending().get() { "Signing in..." } else { "Sign in" }}
                        </button>
                    </ActionForm>
                </div>
                <div class="text-sm text-base-content/60 text-center">
                    <p>"Demo accounts:"</p>
                    {demo_accounts()
                        .into_iter()
                        .map(|account| {
                            let username = account.user_id.trim_start_matches("demo-").to_string();
                            view! { <p><code>{format!("{username} / {username}")}</code></p> }
                        })
                        .collect_view()}
                </div>
            </div>
        </div>
    }
}
