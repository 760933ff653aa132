//! Campaign ID Generator Backend
//!
//! A REST backend that derives deterministic campaign IDs from targeting
//! criteria and tracks generated campaigns in a flat CSV records file.

mod api;
mod config;
mod errors;
mod idgen;
mod models;
mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use store::RecordStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Campaign ID Generator Backend");
    tracing::info!("Records path: {:?}", config.records_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Open the record store
    let store = Arc::new(RecordStore::open(&config.records_path)?);

    // Report existing history; an unreadable file keeps the server up and
    // is surfaced per request instead.
    match store.list().await {
        Ok(records) => tracing::info!("Loaded {} existing campaign records", records.len()),
        Err(e) => tracing::warn!("Records file is unreadable: {}", e),
    }

    // Create application state
    let state = AppState { store };

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
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Campaigns
        .route("/campaigns", get(api::list_campaigns))
        .route("/campaigns", post(api::create_campaign))
        .route("/campaigns/{id}", get(api::get_campaign))
        .route("/campaigns/{id}/export", get(api::export_campaign))
        // Search
        .route("/search", get(api::search_campaigns));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
