use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde_json::{json, Value};
use sqlparser::ast::Ident;
use std::path::Path;

use crate::api::middleware::AppError;
use crate::storage::store::SearchStore;

/// SQLite-backed search store
///
/// The connection is opened read-only; the search pipeline never writes.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open an existing SQLite database file
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, AppError> {
        // Handle SQLite URL format (sqlite:./path or sqlite://path)
        let path_str = db_path.as_ref().to_string_lossy();
        let clean_path: &str = if path_str.starts_with("sqlite:") {
            path_str.trim_start_matches("sqlite:").trim_start_matches("//")
        } else {
            path_str.as_ref()
        };

        let conn = Connection::open_with_flags(
            clean_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|e| AppError::Database(format!("Failed to open store {}: {}", clean_path, e)))?;

        tracing::debug!("Opened store {}", clean_path);
        Ok(Self { conn })
    }

    /// Wrap an already open connection
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    fn quote_ident(name: &str) -> String {
        Ident::with_quote('"', name).to_string()
    }

    fn value_to_json(value: ValueRef<'_>) -> Value {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(v) => json!(v),
            ValueRef::Real(v) => json!(v),
            ValueRef::Text(v) => Value::String(String::from_utf8_lossy(v).into_owned()),
            ValueRef::Blob(v) => json!(format!("<blob {} bytes>", v.len())),
        }
    }
}

impl SearchStore for SqliteStore {
    fn list_mirror_tables(&self, suffix: &str) -> Result<Vec<String>, AppError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;

        let names = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut mirrors = Vec::new();
        for name in names {
            let name = name?;
            if name.len() > suffix.len() && name.ends_with(suffix) {
                mirrors.push(name);
            }
        }
        Ok(mirrors)
    }

    fn list_columns(&self, table: &str) -> Result<Vec<String>, AppError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;

        let columns = stmt
            .query_map(rusqlite::params![table], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    fn sample_values(
        &self,
        table: &str,
        column: &str,
        limit: usize,
    ) -> Result<Vec<String>, AppError> {
        let column = Self::quote_ident(column);
        let sql = format!(
            "SELECT CAST({column} AS TEXT) FROM {table} WHERE {column} IS NOT NULL LIMIT ?1",
            column = column,
            table = Self::quote_ident(table),
        );

        // Blob casts may yield bytes that are not UTF-8
        let mut stmt = self.conn.prepare(&sql)?;
        let values = stmt
            .query_map(rusqlite::params![limit as i64], |row| {
                Ok(match row.get_ref(0)? {
                    ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                        String::from_utf8_lossy(bytes).into_owned()
                    }
                    ValueRef::Integer(v) => v.to_string(),
                    ValueRef::Real(v) => v.to_string(),
                    ValueRef::Null => String::new(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }

    fn execute_read(&self, sql: &str) -> Result<Vec<Value>, AppError> {
        let mut stmt = self.conn.prepare(sql)?;
        if !stmt.readonly() {
            return Err(AppError::InvalidSql(format!(
                "Statement would modify the store: {}",
                sql
            )));
        }

        let column_names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();

        let mut rows = stmt.query([])?;
        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let mut row_obj = serde_json::Map::new();
            for (idx, name) in column_names.iter().enumerate() {
                row_obj.insert(name.clone(), Self::value_to_json(row.get_ref(idx)?));
            }
            results.push(Value::Object(row_obj));
        }

        Ok(results)
    }
}
