//! Meetling server
//!
//! Web app for planning meetings collaboratively: a server-rendered UI plus a JSON REST
//! API, backed by SQLite.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod pages;
mod validation;

use std::sync::Arc;

use axum::{middleware, routing::get, routing::post, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::Schemas;
use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub schemas: Arc<Schemas>,
    pub config: Arc<Config>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    // RUST_LOG takes precedence over MEETLING_LOG_LEVEL
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let (json_layer, text_layer) = if config.log_json {
        (Some(fmt::layer().json()), None)
    } else {
        (None, Some(fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    tracing::info!("Starting Meetling server");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if !config.cookie_secure {
        tracing::warn!("Session cookies are not marked Secure (MEETLING_COOKIE_SECURE)");
    }

    // Argument schemas are checked once, here
    let schemas = Arc::new(Schemas::new()?);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let state = AppState {
        repo,
        schemas,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let page_repo = state.repo.clone();
    let cookie_secure = state.config.cookie_secure;
    let endpoint_repo = state.repo.clone();

    // UI pages
    let page_routes = Router::new()
        .route("/", get(pages::start_page))
        .route("/about", get(pages::about_page))
        .route("/create-meeting", get(pages::create_meeting_page))
        .route("/users/{id}/edit", get(pages::edit_user_page))
        .route("/settings/edit", get(pages::edit_settings_page))
        .route("/meetings/{id}", get(pages::meeting_page))
        .route("/meetings/{id}/edit", get(pages::edit_meeting_page))
        .layer(middleware::from_fn(move |req, next| {
            auth::page_session_layer(page_repo.clone(), cookie_secure, req, next)
        }));

    // JSON API
    let api_routes = Router::new()
        .route("/login", post(api::login))
        .route("/meetings", post(api::create_meeting))
        .route("/create-example-meeting", post(api::create_example_meeting))
        .route("/users/{id}", get(api::get_user).post(api::edit_user))
        .route("/settings", get(api::get_settings).post(api::edit_settings))
        .route("/meetings/{id}", get(api::get_meeting).post(api::edit_meeting))
        .route(
            "/meetings/{id}/items",
            get(api::list_items).post(api::create_item),
        )
        .route(
            "/meetings/{id}/items/{item_id}",
            get(api::get_item).post(api::edit_item),
        );

    let endpoint_routes = Router::new()
        .route("/log-client-error", post(api::log_client_error))
        .nest("/api", api_routes)
        .layer(middleware::from_fn(move |req, next| {
            auth::session_layer(endpoint_repo.clone(), req, next)
        }));

    // Health check (no session)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(page_routes)
        .merge(endpoint_routes)
        .merge(health_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
