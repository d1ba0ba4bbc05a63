//! Row schema definitions and the table schema file.
//!
//! The schema file maps a table key to its ordered column list:
//!
//! ```yaml
//! shop.users:
//!   - name: id
//!     type: int
//!   - name: email
//!     type: string
//! events:
//!   - name: id
//!     type: int
//! ```
//!
//! Keys are `"<keyspace>.<table>"`, or the bare table name when the run has no
//! keyspace. JSON documents are accepted as well since they parse as YAML.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Error type for schema file operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse schema: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Table key not present in the schema file
    #[error("Table '{key}' not found in schema (defined: {defined})")]
    TableNotFound { key: String, defined: String },

    /// Table present but without any column
    #[error("Table '{0}' has no columns")]
    EmptyTable(String),
}

/// Column type as written in the schema file.
///
/// Unknown type names are kept as [`ColumnType::Unsupported`] instead of
/// being rejected while parsing. They only fail once a row is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    Int,
    String,
    Unsupported(String),
}

impl From<String> for ColumnType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "int" => ColumnType::Int,
            "string" => ColumnType::String,
            _ => ColumnType::Unsupported(value),
        }
    }
}

impl From<ColumnType> for String {
    fn from(value: ColumnType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int => write!(f, "int"),
            ColumnType::String => write!(f, "string"),
            ColumnType::Unsupported(name) => write!(f, "{name}"),
        }
    }
}

/// A single column of a row schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name
    pub name: String,

    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnDefinition {
    /// Create a new column definition.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Ordered columns of the target table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSchema {
    columns: Vec<ColumnDefinition>,
    /// When set, every column of a row reuses one draw.
    shared_draw: bool,
}

impl RowSchema {
    /// Schema whose columns each get their own draw.
    pub fn new(columns: Vec<ColumnDefinition>) -> Self {
        Self {
            columns,
            shared_draw: false,
        }
    }

    /// The implicit `id: int, name: string` schema used when no schema file
    /// is given.
    ///
    /// Both columns share a single draw, so `name` is always `name_<id>`.
    pub fn legacy() -> Self {
        Self {
            columns: vec![
                ColumnDefinition::new("id", ColumnType::Int),
                ColumnDefinition::new("name", ColumnType::String),
            ],
            shared_draw: true,
        }
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn shared_draw(&self) -> bool {
        self.shared_draw
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Contents of a table schema file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableSchemas {
    tables: HashMap<String, Vec<ColumnDefinition>>,
}

impl TableSchemas {
    /// Load a schema file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a schema document (YAML or JSON).
    pub fn from_yaml(content: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Key under which a table is looked up.
    pub fn table_key(keyspace: Option<&str>, table: &str) -> String {
        match keyspace {
            Some(keyspace) => format!("{keyspace}.{table}"),
            None => table.to_string(),
        }
    }

    /// Resolve the row schema for a table, failing when the key is missing.
    pub fn resolve(&self, keyspace: Option<&str>, table: &str) -> Result<RowSchema, SchemaError> {
        let key = Self::table_key(keyspace, table);
        let columns = self
            .tables
            .get(&key)
            .ok_or_else(|| SchemaError::TableNotFound {
                key: key.clone(),
                defined: self.table_keys().join(", "),
            })?;

        if columns.is_empty() {
            return Err(SchemaError::EmptyTable(key));
        }

        Ok(RowSchema::new(columns.clone()))
    }

    /// Table keys defined in the file, sorted.
    fn table_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.tables.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        keys
    }
}
