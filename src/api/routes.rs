use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::search::AppState;
use crate::api::handlers::{catalog, search};
use crate::config::Config;
use crate::storage::SqliteStore;

/// Create router with application state
pub fn create_router_with_state(store: Arc<Mutex<SqliteStore>>, config: Config) -> Router {
    let state = AppState { store, config };

    Router::new()
        .route("/health", get(health_check))
        .route("/api/catalog", get(catalog::get_catalog))
        .route("/api/search", post(search::search))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
