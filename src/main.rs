#![recursion_limit = "256"]

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::Router;
    use grasp::api;
    use grasp::app::{shell, App};
    use grasp::config::Settings;
    use grasp::demo_seeder::seed_demo_data;
    use grasp::state::AppState;
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use tower_http::services::ServeDir;
    use tower_http::trace::TraceLayer;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grasp=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting grasp server...");

    let settings = Settings::load()?;
    settings.check_project()?;

    // Load Leptos options from Cargo.toml metadata
    let conf = get_configuration(None)?;
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;
    let site_root = leptos_options.site_root.to_string();

    let state = AppState::from_settings(&settings, leptos_options.clone()).await?;
    if state.demo_mode {
        seed_demo_data(&state).await;
    }

    // Generate the Leptos route list for SSR
    let routes = generate_route_list(App);

    let app = Router::new()
        .merge(api::router(&state))
        .leptos_routes_with_context(
            &state,
            routes,
            {
                let state = state.clone();
                move || provide_context(state.clone())
            },
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        // Static files (wasm bundle, css, assets)
        .fallback_service(ServeDir::new(&site_root))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

// The wasm build has no binary entry point; lib.rs::hydrate() takes over.
#[cfg(not(feature = "ssr"))]
fn main() {}
