use serde::{Deserialize, Serialize};

/// Semantic type inferred for a column from its sample values
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Timestamp,
    Text,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Text => "text",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Typed schema of a base table that has a full-text mirror
///
/// `name` is always the base table name. The mirror name is derived on demand
/// with [`TableSchema::mirror_name`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSchema>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn mirror_name(&self, suffix: &str) -> String {
        format!("{}{}", self.name, suffix)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// First column of the given type, in schema order
    pub fn first_of(&self, column_type: ColumnType) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.column_type == column_type)
    }

    pub fn first_timestamp(&self) -> Option<&ColumnSchema> {
        self.first_of(ColumnType::Timestamp)
    }

    /// First Integer or Float column, whichever comes first in schema order
    pub fn first_numeric(&self) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.column_type.is_numeric())
    }
}

/// Inferred schemas of every mirrored table, built once per invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    pub mirror_suffix: String,
    pub tables: Vec<TableSchema>,
}

impl Catalog {
    pub fn new(mirror_suffix: impl Into<String>, tables: Vec<TableSchema>) -> Self {
        Self {
            mirror_suffix: mirror_suffix.into(),
            tables,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TableSchema> {
        self.tables.iter()
    }
}
