//! Read-only table catalog used during identifier resolution

use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::types::{Block, ColumnHeader};

/// Database used when a table reference is unqualified
pub const DEFAULT_DATABASE: &str = "default";

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

/// Schema of one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(default = "default_database")]
    pub database: String,
    pub name: String,
    pub columns: Vec<ColumnHeader>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnHeader>) -> Self {
        Self {
            database: default_database(),
            name: name.into(),
            columns,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Fully qualified name, `database.table`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.database, self.name)
    }

    /// All columns as a header
    pub fn header(&self) -> Block {
        Block::new(self.columns.clone())
    }
}

/// Table lookup trait.
///
/// Implementations are shared between concurrently analyzed queries and
/// must tolerate concurrent reads.
pub trait Catalog: Debug + Send + Sync {
    /// Looks up a table; `None` database means the default one
    fn table(&self, database: Option<&str>, name: &str) -> Option<TableSchema>;

    /// Qualified names of all tables, sorted
    fn table_names(&self) -> Vec<String>;
}

/// Catalog backed by an in-memory map
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    tables: BTreeMap<String, TableSchema>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a table
    pub fn add_table(&mut self, table: TableSchema) {
        self.tables.insert(table.qualified_name(), table);
    }

    pub fn with_table(mut self, table: TableSchema) -> Self {
        self.add_table(table);
        self
    }
}

impl Catalog for InMemoryCatalog {
    fn table(&self, database: Option<&str>, name: &str) -> Option<TableSchema> {
        let key = format!("{}.{}", database.unwrap_or(DEFAULT_DATABASE), name);
        self.tables.get(&key).cloned()
    }

    fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn users() -> TableSchema {
        TableSchema::new(
            "users",
            vec![
                ColumnHeader::new("id", DataType::UInt64),
                ColumnHeader::new("name", DataType::String),
            ],
        )
    }

    #[test]
    fn test_lookup_default_database() {
        let catalog = InMemoryCatalog::new().with_table(users());

        assert!(catalog.table(None, "users").is_some());
        assert!(catalog.table(Some("default"), "users").is_some());
        assert!(catalog.table(Some("other"), "users").is_none());
        assert!(catalog.table(None, "posts").is_none());
    }

    #[test]
    fn test_table_names_sorted() {
        let catalog = InMemoryCatalog::new()
            .with_table(users().with_database("zeta"))
            .with_table(users());

        assert_eq!(catalog.table_names(), vec!["default.users", "zeta.users"]);
    }
}
