use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

use crate::auth::models::AuthenticatedUser;
use crate::components::library::DocumentsPage;
use crate::components::login::LoginPage;
use crate::editor::component::ReadingPage;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en" data-theme="light">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <MetaTags/>
                <script type="module" src="/js/tiptap-bundle.min.js"></script>
                <script type="module" src="/js/tiptap.js"></script>
            </head>
            <body class="min-h-screen bg-base-200">
                <App/>
            </body>
        </html>
    }
}

/// The user behind the session cookie, if any.
#[server(GetCurrentUser, "/api")]
pub async fn current_user() -> Result<Option<AuthenticatedUser>, ServerFnError> {
    use axum_extra::extract::CookieJar;

    let jar = leptos_axum::extract::<CookieJar>().await?;
    Ok(crate::auth::demo_auth::user_from_jar(&jar).ok())
}

#[server(Login, "/api")]
pub async fn login(username: String, password: String) -> Result<(), ServerFnError> {
    use crate::api::errors::to_server_fn_error;
    use crate::auth::demo_auth::{authenticate_demo_user, session_cookie};
    use axum::http::{header::SET_COOKIE, HeaderValue};

    let user = authenticate_demo_user(&username, &password).map_err(to_server_fn_error)?;
    let cookie = session_cookie(&user).map_err(to_server_fn_error)?;
    let value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    expect_context::<leptos_axum::ResponseOptions>().insert_header(SET_COOKIE, value);
    tracing::info!(user_id = %user.user_id, "signed in");
    leptos_axum::redirect("/documents");
    Ok(())
}

#[server(Logout, "/api")]
pub async fn logout() -> Result<(), ServerFnError> {
    use crate::auth::demo_auth::removal_cookie;
    use axum::http::{header::SET_COOKIE, HeaderValue};

    let value = HeaderValue::from_str(&removal_cookie().to_string())
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    expect_context::<leptos_axum::ResponseOptions>().insert_header(SET_COOKIE, value);
    leptos_axum::redirect("/");
    Ok(())
}

/// Session actions and the user they produce, shared through context.
#[derive(Clone, Copy)]
pub struct Session {
    pub user: Resource<Result<Option<AuthenticatedUser>, ServerFnError>>,
    pub login: ServerAction<Login>,
    pub logout: ServerAction<Logout>,
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let login = ServerAction::<Login>::new();
    let logout = ServerAction::<Logout>::new();
    let user = Resource::new(
        move || (login.version().get(), logout.version().get()),
        |_| current_user(),
    );
    provide_context(Session { user, login, logout });

    view! {
        <Stylesheet id="leptos" href="/pkg/grasp.css"/>
        <Title text="grasp.now"/>

        <Router>
            <main class="min-h-screen">
                <Routes fallback=|| view! { <NotFound/> }.into_view()>
                    <Route path=path!("/") view=HomePage/>
                    <Route path=path!("/documents") view=|| view! { <RequireAuth><DocumentsPage/></RequireAuth> }/>
                    <Route path=path!("/document/:id") view=|| view! { <RequireAuth><ReadingPage/></RequireAuth> }/>
                </Routes>
            </main>
        </Router>
    }
}

/// Sign-in screen, or straight to the library when already signed in.
#[component]
fn HomePage() -> impl IntoView {
    let session = expect_context::<Session>();

    view! {
        <Suspense fallback=|| view! { <Loading/> }>
            {move || session.user.get().map(|user| match user {
                Ok(Some(_)) => view! { <Redirect path="/documents"/> }.into_any(),
                _ => view! { <LoginPage/> }.into_any(),
            })}
        </Suspense>
    }
}

/// Renders its children only for a signed-in user; everyone else sees the
/// sign-in screen. The user is provided as context to the children.
#[component]
fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<Session>();

    view! {
        <Suspense fallback=|| view! { <Loading/> }>
            {move || session.user.get().map(|user| match user {
                Ok(Some(user)) => {
                    provide_context(user.clone());
                    view! {
                        <Header user=user/>
                        {children()}
                    }.into_any()
                }
                _ => view! { <LoginPage/> }.into_any(),
            })}
        </Suspense>
    }
}

#[component]
fn Header(user: AuthenticatedUser) -> impl IntoView {
    let session = expect_context::<Session>();

    view! {
        <div class="navbar bg-base-100 shadow-sm px-4">
            <div class="flex-1">
                <a href="/documents" class="btn btn-ghost text-xl">"grasp.now"</a>
            </div>
            <div class="flex-none gap-2 items-center">
                <span class="text-sm text-base-content/70">{user.short_name().to_string()}</span>
                <ActionForm action=session.logout>
                    <button type="submit" class="btn btn-sm btn-ghost">"Sign out"</button>
                </ActionForm>
            </div>
        </div>
    }
}

#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex justify-center py-12">
            <span class="loading loading-spinner loading-lg"></span>
        </div>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="hero min-h-[60vh]">
            <div class="hero-content text-center">
                <div>
                    <h1 class="text-3xl font-bold">"Page not found"</h1>
                    <a href="/documents" class="btn btn-primary mt-6">"Back to documents"</a>
                </div>
            </div>
        </div>
    }
}
