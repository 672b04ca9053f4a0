use serde::{Deserialize, Serialize};

use super::catalog::TableSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ordering {
    pub column: String,
    pub direction: SortDirection,
}

/// Structured search query produced by the translator
///
/// The plan is rendered exactly once into an executable statement; rendering
/// depends on nothing but the plan itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryPlan {
    pub target: TableSchema,
    pub mirror_table: String,
    pub match_expression: String,
    pub filters: Vec<String>,
    pub order: Option<Ordering>,
    pub limit: Option<u64>,
}

impl QueryPlan {
    pub fn new(target: TableSchema, mirror_suffix: &str, match_expression: String) -> Self {
        let mirror_table = target.mirror_name(mirror_suffix);
        Self {
            target,
            mirror_table,
            match_expression,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Render the plan as a single SQLite statement against the mirror table
    pub fn render(&self) -> String {
        let mut sql = format!(
            "SELECT rowid, * FROM {mirror} WHERE {mirror} MATCH '{expr}'",
            mirror = self.mirror_table,
            expr = self.match_expression.replace('\'', "''"),
        );

        for filter in &self.filters {
            sql.push_str(" AND ");
            sql.push_str(filter);
        }

        if let Some(order) = &self.order {
            sql.push_str(&format!(
                " ORDER BY {} {}",
                order.column,
                order.direction.as_sql()
            ));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        sql
    }
}

/// Result of translating free text against a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Sql(String),
    NotUnderstood,
}

impl Translation {
    pub fn sql(&self) -> Option<&str> {
        match self {
            Translation::Sql(sql) => Some(sql),
            Translation::NotUnderstood => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchReport {
    pub query: String,
    pub sql: String,
    pub count: usize,
    pub rows: Vec<serde_json::Value>,
}

impl SearchReport {
    pub fn new(query: String, sql: String, rows: Vec<serde_json::Value>) -> Self {
        Self {
            query,
            sql,
            count: rows.len(),
            rows,
        }
    }
}

/// Either a full report or the "could not interpret" answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SearchOutcome {
    Report(SearchReport),
    Error { error: String },
}

impl SearchOutcome {
    pub fn not_understood(query: &str) -> Self {
        SearchOutcome::Error {
            error: format!("could not interpret query: {}", query),
        }
    }
}

/// Translation shown without executing it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExplainReport {
    pub query: String,
    pub sql: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub dry_run: bool,
}
