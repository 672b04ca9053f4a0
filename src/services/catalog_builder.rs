use crate::api::middleware::AppError;
use crate::config::StoreConfig;
use crate::models::{Catalog, ColumnSchema, TableSchema};
use crate::services::TypeInferencer;
use crate::storage::SearchStore;

/// Builds the typed catalog of every table that has a full-text mirror
///
/// Mirrors are discovered by name suffix; the schema of each entry comes from
/// the base table obtained by stripping that suffix. A base table that is
/// missing, has no columns, or cannot be sampled is skipped.
pub struct CatalogBuilder {
    mirror_suffix: String,
    sample_size: usize,
}

impl CatalogBuilder {
    pub fn new(mirror_suffix: impl Into<String>, sample_size: usize) -> Self {
        Self {
            mirror_suffix: mirror_suffix.into(),
            sample_size,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.mirror_suffix.clone(), config.sample_size)
    }

    pub fn build<S: SearchStore + ?Sized>(&self, store: &S) -> Result<Catalog, AppError> {
        let mirrors = store.list_mirror_tables(&self.mirror_suffix)?;

        let mut tables = Vec::with_capacity(mirrors.len());
        for mirror in &mirrors {
            let Some(base) = mirror.strip_suffix(self.mirror_suffix.as_str()) else {
                continue;
            };
            match self.build_table(store, base) {
                Ok(Some(table)) => tables.push(table),
                Ok(None) => {
                    tracing::warn!("Skipping mirror {}: base table {} has no columns", mirror, base);
                }
                Err(e) => {
                    tracing::warn!("Skipping mirror {}: {}", mirror, e);
                }
            }
        }

        tracing::info!(
            "Built catalog with {} of {} mirrored tables",
            tables.len(),
            mirrors.len()
        );
        Ok(Catalog::new(self.mirror_suffix.clone(), tables))
    }

    fn build_table<S: SearchStore + ?Sized>(
        &self,
        store: &S,
        table: &str,
    ) -> Result<Option<TableSchema>, AppError> {
        let names = store.list_columns(table)?;
        if names.is_empty() {
            return Ok(None);
        }

        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let column_type = TypeInferencer::infer_column(store, table, &name, self.sample_size)?;
            columns.push(ColumnSchema::new(name, column_type));
        }

        Ok(Some(TableSchema::new(table, columns)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnType;
    use crate::storage::{fixtures, SqliteStore};
    use serde_json::Value;
    use tempfile::tempdir;

    #[test]
    fn test_build_catalog_from_store() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(fixtures::create_store(dir.path())).unwrap();

        let catalog = CatalogBuilder::new("_fts", 10).build(&store).unwrap();
        let names: Vec<&str> = catalog.iter().map(|t| t.name.as_str()).collect();
        // ghosts_fts has no base table
        assert_eq!(names, vec!["books", "orders", "products"]);

        let books = catalog.table("books").unwrap();
        let types: Vec<(&str, ColumnType)> = books
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c.column_type))
            .collect();
        assert_eq!(
            types,
            vec![
                ("id", ColumnType::Integer),
                ("title", ColumnType::Text),
                ("author", ColumnType::Text),
                ("published", ColumnType::Timestamp),
                ("price", ColumnType::Float),
            ]
        );

        let orders = catalog.table("orders").unwrap();
        assert_eq!(orders.column("created_at").unwrap().column_type, ColumnType::Timestamp);
        assert_eq!(orders.column("note").unwrap().column_type, ColumnType::Text);
    }

    #[test]
    fn test_binary_column_is_cataloged_as_text() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE docs (title TEXT, thumb BLOB);
             INSERT INTO docs VALUES ('cover', x'fffe00');
             CREATE VIRTUAL TABLE docs_fts USING fts4(title);",
        )
        .unwrap();
        let store = SqliteStore::from_connection(conn);

        let catalog = CatalogBuilder::new("_fts", 10).build(&store).unwrap();
        assert_eq!(catalog.len(), 1);
        let docs = catalog.table("docs").unwrap();
        assert_eq!(docs.column("thumb").unwrap().column_type, ColumnType::Text);
    }

    #[test]
    fn test_unknown_suffix_gives_empty_catalog() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(fixtures::create_store(dir.path())).unwrap();

        let catalog = CatalogBuilder::new("_search", 10).build(&store).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.mirror_suffix, "_search");
    }

    /// Store whose sampling fails for one table
    struct FlakyStore;

    impl SearchStore for FlakyStore {
        fn list_mirror_tables(&self, _suffix: &str) -> Result<Vec<String>, AppError> {
            Ok(vec!["broken_fts".to_string(), "notes_fts".to_string()])
        }

        fn list_columns(&self, _table: &str) -> Result<Vec<String>, AppError> {
            Ok(vec!["body".to_string()])
        }

        fn sample_values(
            &self,
            table: &str,
            _column: &str,
            _limit: usize,
        ) -> Result<Vec<String>, AppError> {
            if table == "broken" {
                Err(AppError::Database("malformed table".to_string()))
            } else {
                Ok(vec!["hello".to_string()])
            }
        }

        fn execute_read(&self, _sql: &str) -> Result<Vec<Value>, AppError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_sampling_failure_skips_only_that_table() {
        let catalog = CatalogBuilder::new("_fts", 10).build(&FlakyStore).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.tables[0].name, "notes");
        assert_eq!(catalog.tables[0].columns[0].column_type, ColumnType::Text);
    }
}
