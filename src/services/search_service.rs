use std::time::Instant;

use crate::api::middleware::AppError;
use crate::config::StoreConfig;
use crate::models::{Catalog, SearchOutcome, SearchReport, Translation};
use crate::services::{CatalogBuilder, QueryTranslator};
use crate::storage::SearchStore;

/// Runs one search invocation: build catalog, translate, execute, report
///
/// The catalog is rebuilt on every call and never shared between calls.
pub struct SearchService {
    catalog_builder: CatalogBuilder,
}

impl SearchService {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            catalog_builder: CatalogBuilder::from_config(config),
        }
    }

    pub fn catalog<S: SearchStore + ?Sized>(&self, store: &S) -> Result<Catalog, AppError> {
        self.catalog_builder.build(store)
    }

    /// Translate a request without executing it
    pub fn explain<S: SearchStore + ?Sized>(
        &self,
        store: &S,
        text: &str,
    ) -> Result<Translation, AppError> {
        let catalog = self.catalog(store)?;
        Ok(QueryTranslator::translate(&catalog, text))
    }

    /// Translate and execute a request
    ///
    /// A request that names no known table yields `SearchOutcome::Error`, not
    /// an `Err`; only store faults are returned as errors.
    pub fn search<S: SearchStore + ?Sized>(
        &self,
        store: &S,
        text: &str,
    ) -> Result<SearchOutcome, AppError> {
        let sql = match self.explain(store, text)? {
            Translation::Sql(sql) => sql,
            Translation::NotUnderstood => {
                tracing::warn!("Could not interpret query: {}", text);
                return Ok(SearchOutcome::not_understood(text));
            }
        };

        tracing::info!("Generated SQL for {:?}: {}", text, sql);

        let start_time = Instant::now();
        let rows = store.execute_read(&sql).map_err(|e| {
            tracing::error!("Query execution error: {}. SQL: {}", e, sql);
            e
        })?;

        tracing::info!(
            "Search returned {} rows in {} ms",
            rows.len(),
            start_time.elapsed().as_millis()
        );

        Ok(SearchOutcome::Report(SearchReport::new(
            text.to_string(),
            sql,
            rows,
        )))
    }
}
