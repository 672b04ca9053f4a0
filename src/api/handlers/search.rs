use axum::{extract::State, Json};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::api::middleware::AppError;
use crate::config::Config;
use crate::models::{ExplainReport, SearchOutcome, SearchRequest, Translation};
use crate::services::SearchService;
use crate::storage::SqliteStore;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<SqliteStore>>,
    pub config: Config,
}

/// Translate a free-text request and run it against the store
pub async fn search(
    State(state): State<AppState>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let query = payload.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("Query cannot be empty".to_string()));
    }

    tracing::info!("Search request: {}", query);

    let store = state.store.lock().await;
    let body = run_search(&store, &state.config, query, payload.dry_run)?;
    Ok(Json(body))
}

fn run_search(
    store: &SqliteStore,
    config: &Config,
    query: &str,
    dry_run: bool,
) -> Result<serde_json::Value, AppError> {
    let service = SearchService::new(&config.store);

    if !dry_run {
        let outcome = service.search(store, query)?;
        return Ok(serde_json::json!(outcome));
    }

    let body = match service.explain(store, query)? {
        Translation::Sql(sql) => serde_json::json!(ExplainReport {
            query: query.to_string(),
            sql,
        }),
        Translation::NotUnderstood => serde_json::json!(SearchOutcome::not_understood(query)),
    };
    Ok(body)
}
