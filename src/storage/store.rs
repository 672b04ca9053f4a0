// Store access boundary used by the catalog builder and the search service
use crate::api::middleware::AppError;
use serde_json::Value;

/// Read-only access to a relational store with full-text mirror tables
pub trait SearchStore {
    /// Names of all tables whose name ends with `suffix`, in listing order
    fn list_mirror_tables(&self, suffix: &str) -> Result<Vec<String>, AppError>;

    /// Column names of `table` in declaration order; empty when the table is missing
    fn list_columns(&self, table: &str) -> Result<Vec<String>, AppError>;

    /// Up to `limit` non-null values of one column, in their text representation
    fn sample_values(&self, table: &str, column: &str, limit: usize)
        -> Result<Vec<String>, AppError>;

    /// Execute a read query and return each row as a JSON object keyed by column name
    fn execute_read(&self, sql: &str) -> Result<Vec<Value>, AppError>;
}
