use axum::{extract::State, Json};

use crate::api::handlers::search::AppState;
use crate::api::middleware::AppError;
use crate::models::Catalog;
use crate::services::CatalogBuilder;

/// Inferred schema of every mirrored table in the store
pub async fn get_catalog(State(state): State<AppState>) -> Result<Json<Catalog>, AppError> {
    let store = state.store.lock().await;
    let catalog = CatalogBuilder::from_config(&state.config.store).build(&*store)?;
    Ok(Json(catalog))
}
